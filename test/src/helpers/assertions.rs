/// Assert that a server call was refused by a permission check
#[macro_export]
macro_rules! assert_denied {
    ($result:expr) => {
        match $result {
            Err(error) => assert!(error.is_denial(), "expected a denial, got {:?}", error),
            Ok(value) => panic!("expected a denial, got Ok({:?})", value),
        }
    };
}

/// Assert the number of items counted on a connection's permission
#[macro_export]
macro_rules! assert_items {
    ($server:expr, $connection:expr, $name:expr, $expected:expr) => {
        assert_eq!(
            $server
                .permissions_mut()
                .get_permission($connection, $name)
                .expect("permission exists")
                .current_items(),
            $expected,
            "items counted on {}",
            $name
        );
    };
}
