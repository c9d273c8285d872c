//! Macros for console output
//!
//! Progress lines go to stdout, warnings and errors to stderr. The
//! `debug:` form is only active in debug builds, so request details never
//! show up in release output.

/// Print a line to the console
///
/// This unified macro supports multiple message types:
/// - cprintln!("message")                    - Regular message
/// - cprintln!(info: "message")              - Info message
/// - cprintln!(success: "message")           - Success message
/// - cprintln!(warn: "message")              - Warning message
/// - cprintln!(error: "message")             - Error message
/// - cprintln!(debug: "message")             - Debug message (debug builds only)
#[macro_export]
macro_rules! cprintln {
    // Empty case
    () => {
        println!()
    };

    // Info message: info: format
    (info: $($arg:tt)*) => {{
        println!("{}ℹ️ Info:{} {}",
                 $crate::constants::FORMAT_BOLD,
                 $crate::constants::FORMAT_RESET,
                 format!($($arg)*));
    }};

    // Success message: success: format
    (success: $($arg:tt)*) => {{
        println!("{}✅ {}{}",
                 $crate::constants::FORMAT_GREEN,
                 format!($($arg)*),
                 $crate::constants::FORMAT_RESET);
    }};

    // Warning message: warn: format
    (warn: $($arg:tt)*) => {{
        eprintln!("{}⚠️ Warning:{} {}",
                  $crate::constants::FORMAT_YELLOW,
                  $crate::constants::FORMAT_RESET,
                  format!($($arg)*));
    }};

    // Error message: error: format
    (error: $($arg:tt)*) => {{
        eprintln!("{}❌ Error:{} {}",
                  $crate::constants::FORMAT_RED,
                  $crate::constants::FORMAT_RESET,
                  format!($($arg)*));
    }};

    // Debug message: debug: format (only active in debug builds)
    (debug: $($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        {
            println!("{}🔍 Debug:{} {}",
                     $crate::constants::FORMAT_CYAN,
                     $crate::constants::FORMAT_RESET,
                     format!($($arg)*));
        }
        // In release builds, this is a no-op
        #[cfg(not(debug_assertions))]
        {
            // Do nothing
        }
    }};

    // Default case (regular message)
    ($($arg:tt)*) => {{
        println!($($arg)*);
    }};
}
