#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok(_), got Err({:?})", err),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!(concat!("Expected Ok(_): ", $($arg)+, ": {:?}"), err),
        }
    };
}

#[macro_export]
macro_rules! assert_err {
    ($expr:expr, $expected:pat) => {
        match $expr {
            Err($expected) => {},
            Err(err) => panic!("Expected Err({}), got Err({:?})", stringify!($expected), err),
            Ok(_) => panic!("Expected Err({}), got Ok(_)", stringify!($expected)),
        }
    };
}
