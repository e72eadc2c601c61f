/// A builder macro that creates a `Dict` from a seed, a capacity and a list
/// of key-value pairs.
///
/// # Examples
///
/// ```
/// use bytedict::dict;
///
/// let colors = dict! {
///     0xdead_beef, 16;
///     b"red": 0xff0000,
///     b"green": 0x00ff00,
///     b"blue": 0x0000ff,
/// };
///
/// assert_eq!(colors.len(), 3);
/// assert_eq!(colors.capacity(), 16);
/// assert_eq!(colors.seed(), 0xdead_beef);
///
/// assert_eq!(colors.get(b"red"), Some(&0xff0000));
/// assert_eq!(colors.get(b"green"), Some(&0x00ff00));
/// assert_eq!(colors.get(b"blue"), Some(&0x0000ff));
/// ```
#[macro_export]
macro_rules! dict {
    // Seed and capacity, then the key-value pairs.
    ( $seed:expr, $capacity:expr ; $( $key:tt : $value:expr ),* $(,)? ) => {
        {
            let mut dict = $crate::Dict::new($seed, $capacity);
            $(
                dict.set($key, $value);
            )*
            dict
        }
    };
    // Catch-all pattern for invalid patterns.
    ( $($tt:tt)* ) => {
        compile_error!("Invalid syntax. Use `dict! { seed, capacity; key: value, ... }`.");
    };
}

#[cfg(test)]
mod builder_tests {
    #[test]
    fn test_builder() {
        let dict = dict! {
            7, 8;
            b"one": 1,
            b"two": 2,
            b"three": 3,
        };

        assert_eq!(dict.len(), 3);
        assert_eq!(dict.capacity(), 8);
        assert_eq!(dict.seed(), 7);

        assert_eq!(dict.get(b"one"), Some(&1));
        assert_eq!(dict.get(b"two"), Some(&2));
        assert_eq!(dict.get(b"three"), Some(&3));
    }

    #[test]
    fn test_builder_empty() {
        let dict: crate::Dict<i32> = dict! { 7, 4; };

        assert!(dict.is_empty());
        assert_eq!(dict.capacity(), 4);
    }

    #[test]
    fn test_builder_duplicate_keys_overwrite() {
        let dict = dict! {
            7, 8;
            b"one": 1,
            b"one": 11,
        };

        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get(b"one"), Some(&11));
    }
}
