use crate::local::run_local;

const KERNEL_HOSTNAME: &str = "/proc/sys/kernel/hostname";

/// Name of this host as the cluster knows it.
pub fn local_hostname() -> String {
    if let Ok(raw) = std::fs::read_to_string(KERNEL_HOSTNAME) {
        let name = raw.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    run_local("uname -n")
        .data()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "localhost".to_string())
}
