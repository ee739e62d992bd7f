#[macro_export]
macro_rules! timeit {
    ($code:expr) => {
        $crate::_timeit_internal!("Parse", $code)
    };

    ($code:block) => {
        $crate::_timeit_internal!("Parse", $code)
    };

    ($name:literal, $code:expr) => {
        $crate::_timeit_internal!($name, $code)
    };

    ($name:literal, $code:block) => {
        $crate::_timeit_internal!($name, $code)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! _timeit_internal {
    ($label:expr, $code:expr) => {{
        let start = std::time::Instant::now();
        let result = $code;
        let duration = start.elapsed();

        log::info!(
            "{} took {}.{:06} seconds",
            $label,
            duration.as_secs(),
            duration.subsec_micros()
        );

        result
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::{protocol::parse_multiline, types::DelimiterSet};

    #[test]
    fn test_timeit_returns_value() {
        assert_eq!(crate::timeit!(40 + 2), 42);
        assert_eq!(crate::timeit!("addition", 40 + 2), 42);
    }

    #[test]
    fn test_timeit_block() {
        let records = crate::timeit!({
            let delimiters = DelimiterSet::from(" ");
            parse_multiline("a=1\n\nb=2", &delimiters)
        });
        assert_eq!(records.len(), 2);

        let count = crate::timeit!("named block", {
            let mut n = 0;
            for _ in 0..3 {
                n += 1;
            }
            n
        });
        assert_eq!(count, 3);
    }
}
