//! Single-endpoint source macros
//!
//! Use declarative macros to eliminate repetitive code templates in sources

/// Define the common template for a single-endpoint source
///
/// Generates:
/// - Structure holding the shared `HttpFetcher` and one field per endpoint URL
/// - `SOURCE` constant (origin host, also the `source` tag)
/// - `new` and `with_base_url` constructors
///
/// The `PointSource` implementation stays hand-written in each module since
/// the response-to-point mapping is the only part that differs.
///
/// # Usage
/// ```ignore
/// define_point_source!(
///     /// bitstamp.net ticker
///     Bitstamp,                                    // Source name
///     "bitstamp.net",                              // Origin host
///     {
///         usd_url => "https://www.bitstamp.net/api/v2/ticker/btcusd/",
///         eur_url => "https://www.bitstamp.net/api/v2/ticker/btceur/",
///     }
/// );
/// ```
macro_rules! define_point_source {
    (
        $(#[$meta:meta])*
        $name:ident,
        $source:expr,
        { $($url_field:ident => $url:expr),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            http: $crate::http::HttpFetcher,
            $($url_field: String,)+
        }

        impl $name {
            pub const SOURCE: &'static str = $source;

            pub fn new(http: $crate::http::HttpFetcher) -> Self {
                Self {
                    http,
                    $($url_field: $url.to_string(),)+
                }
            }

            /// Point every endpoint at `base`, keeping paths and queries
            pub fn with_base_url(mut self, base: &str) -> Self {
                $(self.$url_field = $crate::http::rebase(&self.$url_field, base);)+
                self
            }
        }
    };
}
