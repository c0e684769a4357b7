/// Panics unless the option is `None`.
#[macro_export]
macro_rules! assert_none {
    ($e:expr) => {
        if let Some(actual) = &$e {
            panic!(
                "expected `None` from `{}`; actual=Some({:?})",
                stringify!($e),
                actual
            );

        }
    };
}

/// Unwraps a `Some`, naming the expression when it is `None`.
#[macro_export]
macro_rules! assert_some {
    ($e:expr) => {
        match $e {
            Some(v) => v,
            None => panic!("expected `Some` from `{}`", stringify!($e)),
        }
    };
}
