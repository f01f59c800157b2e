/// Configuration macros for single-declaration config definitions
///
/// `config_struct!` defines a configuration section with its defaults in one
/// place and generates:
/// - The struct with public fields
/// - A `Default` implementation with the declared values
/// - Serde support with `#[serde(default)]`, so partial TOML files work
///
/// # Example
/// ```
/// drugsignals::config_struct! {
///     pub struct ExampleConfig {
///         timeout_secs: u64 = 30,
///         enabled: bool = true,
///     }
/// }
///
/// assert_eq!(ExampleConfig::default().timeout_secs, 30);
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
