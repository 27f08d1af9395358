/// Early-returns `Err($e)` from the enclosing function unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $e:expr $(,)?) => {
        if !$cond {
            return Err($e);
        }
    };
}

/// Unwraps an [`Ok`] value, panicking with the failing expression otherwise.
#[macro_export]
macro_rules! assert_ok {
    ( $x:expr ) => {
        match $x {
            std::result::Result::Ok(v) => v,
            std::result::Result::Err(e) => {
                panic!("{} failed with {:?}", stringify!($x), e);
            }
        }
    };
}

/// Checks that `$x` is an [`Err`] equal to `$e`.
#[macro_export]
macro_rules! assert_err {
    ( $x:expr, $e:expr ) => {
        match $x {
            std::result::Result::Err(e) => {
                if $e != e {
                    panic!("expected {}, got {:?}", stringify!($e), e)
                }
            }
            std::result::Result::Ok(v) => {
                panic!("expected {} from {}, got Ok({:?})", stringify!($e), stringify!($x), v);
            }
        }
    };
}

/// Checks a `try_` client call against a contract error.
///
/// Generated clients nest results: `Err(Ok(e))` is an error returned by the contract,
/// `Err(Err(_))` a failure of the invocation itself.
#[macro_export]
macro_rules! assert_contract_err {
    ($given:expr, $expected:expr) => {
        match $given {
            std::result::Result::Ok(v) => {
                panic!("expected {:?}, got {:?}", $expected, v)
            }
            std::result::Result::Err(std::result::Result::Err(e)) => {
                panic!("expected {:?}, invocation failed with {:?}", $expected, e)
            }
            std::result::Result::Err(std::result::Result::Ok(e)) => {
                if e != $expected {
                    panic!("expected {:?}, got {:?}", $expected, e)
                }
            }
        }
    };
}
