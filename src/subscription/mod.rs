//! Subscription aggregation
//!
//! Fetches the configured sources, merges their nodes with manually
//! configured ones and either serves the result as base64 or hands it to
//! the conversion service for the requesting client's format.

pub mod classifier;
pub mod fetcher;
pub mod naming;
pub mod normalizer;
pub mod pipeline;
pub mod target;
pub mod upstream;
pub mod warp;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

pub use fetcher::{AggregationResult, FetchError, FetchOutcome, SourceFetcher};
pub use normalizer::NodeSet;
pub use pipeline::{SubscriptionOutput, SubscriptionService};
pub use target::{QueryFlags, Target};
pub use upstream::{ConverterClient, ConverterEndpoint, UpstreamSourceDescriptor};

/// Characters `encodeURIComponent` leaves untouched
pub const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::utf8_percent_encode;

    #[test]
    fn test_uri_component_matches_encode_uri_component() {
        assert_eq!(
            utf8_percent_encode("a-b_c.d!e~f*g'h(i)j k/l?m=n&o|p+q#节", URI_COMPONENT).to_string(),
            "a-b_c.d!e~f*g'h(i)j%20k%2Fl%3Fm%3Dn%26o%7Cp%2Bq%23%E8%8A%82"
        );
    }
}
