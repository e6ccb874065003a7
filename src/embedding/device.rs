use candle_core::Device;
use tracing::{debug, warn};

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

/// Picks the first usable accelerator compiled into this build, else the CPU.
///
/// Metal is tried before CUDA. Failing accelerators are logged and skipped;
/// the CPU is always available, so selection itself never fails.
pub fn select_device() -> Device {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!(backend = "metal", "Using GPU acceleration");
            return device;
        }
        Err(e) => failures.push(format!("metal: {e}")),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!(backend = "cuda", "Using GPU acceleration");
            return device;
        }
        Err(e) => failures.push(format!("cuda: {e}")),
    }

    if failures.is_empty() {
        debug!("No GPU backend compiled, using CPU");
    } else {
        warn!(failures = %failures.join("; "), "GPU backends unavailable, falling back to CPU");
    }

    Device::Cpu
}

/// Short backend name for logs and `Debug` output.
pub fn device_label(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else if device.is_metal() {
        "metal"
    } else {
        "cpu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    fn test_cpu_only_build_selects_cpu() {
        let device = select_device();
        assert!(matches!(device, Device::Cpu));
        assert_eq!(device_label(&device), "cpu");
    }
}
