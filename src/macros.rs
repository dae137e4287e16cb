#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// `eprintln!` gated on `SILABEX_DEBUG_DERIVE`.
macro_rules! trace {
    ($($arg:tt)*) => {
        if *$crate::DEBUG {
            eprintln!($($arg)*);
        }
    };
}
