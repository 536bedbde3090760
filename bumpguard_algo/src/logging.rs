//! Log shims: `defmt` on target, stdout under `cfg(test)`, nothing otherwise.
//!
//! Format strings must stay within the subset both `defmt` and `core::fmt` accept
//! (`{}`, `{:?}`, `{:#x}`).

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        std::println!("[INFO] {}", std::format!($($arg)*));
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        std::println!("[WARN] {}", std::format!($($arg)*));
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        std::println!("[DEBUG] {}", std::format!($($arg)*));
    }};
}
