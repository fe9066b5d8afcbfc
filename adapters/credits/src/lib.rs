#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Remaining-lives lookup against a NEM node.
//!
//! A player's lives are the quantity of the [`HEART_MOSAIC`] held by their
//! account. [`CreditFeed`] performs the lookup off the game thread and hands
//! the result over through a channel that the clock drains between ticks.

use std::{
    env, fmt,
    sync::mpsc::{self, Receiver},
    thread,
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Fully qualified name of the mosaic counting a player's lives.
pub const HEART_MOSAIC: &str = "evias.pacnem:heart";

/// Port NEM nodes listen on unless configured otherwise.
pub const DEFAULT_NODE_PORT: u16 = 7890;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while talking to a NEM node.
#[derive(Debug, Error)]
pub enum CreditError {
    /// The HTTP client could not be constructed.
    #[error("failed to build the HTTP client")]
    Client(#[source] reqwest::Error),
    /// The request did not complete.
    #[error("request to {url} failed")]
    Transport {
        /// Address that was requested.
        url: String,
        /// Underlying transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The node answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status {
        /// Address that was requested.
        url: String,
        /// HTTP status code received.
        status: u16,
    },
    /// The mosaic listing was not valid JSON of the expected shape.
    #[error("malformed mosaic listing")]
    Decode(#[from] serde_json::Error),
    /// A port override could not be parsed.
    #[error("{variable} holds an invalid port: {value:?}")]
    InvalidPort {
        /// Environment variable carrying the override.
        variable: String,
        /// Rejected value.
        value: String,
    },
}

/// Account address with the display dashes removed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerAddress(String);

impl PlayerAddress {
    /// Normalizes `raw` by dropping dashes and whitespace and upper-casing it.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(
            raw.chars()
                .filter(|symbol| *symbol != '-' && !symbol.is_whitespace())
                .map(|symbol| symbol.to_ascii_uppercase())
                .collect(),
        )
    }

    /// Normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// NEM network a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Public test network.
    Testnet,
    /// Private Mijin network.
    Mijin,
    /// Public main network.
    Mainnet,
}

impl Network {
    /// Test mode wins over Mijin; neither means the main network.
    #[must_use]
    pub const fn select(test_mode: bool, mijin: bool) -> Self {
        if test_mode {
            Self::Testnet
        } else if mijin {
            Self::Mijin
        } else {
            Self::Mainnet
        }
    }

    /// Human readable network name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Testnet => "Testnet",
            Self::Mijin => "Mijin",
            Self::Mainnet => "Mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where to reach the node and which network it serves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSettings {
    /// Node host name or address.
    pub host: String,
    /// Node port.
    pub port: u16,
    /// Network served by the node.
    pub network: Network,
}

impl NodeSettings {
    /// Applies `NEM_HOST`/`NEM_PORT` overrides from the process environment.
    ///
    /// In test mode the variables carry a `_TEST` suffix.
    pub fn from_env(
        host: &str,
        port: u16,
        test_mode: bool,
        mijin: bool,
    ) -> Result<Self, CreditError> {
        Self::with_overrides(host, port, test_mode, mijin, |name| env::var(name).ok())
    }

    /// Applies overrides supplied by `lookup` instead of the process environment.
    pub fn with_overrides<F>(
        host: &str,
        port: u16,
        test_mode: bool,
        mijin: bool,
        lookup: F,
    ) -> Result<Self, CreditError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let suffix = if test_mode { "_TEST" } else { "" };
        let host = lookup(&format!("NEM_HOST{suffix}")).unwrap_or_else(|| host.to_owned());

        let port_variable = format!("NEM_PORT{suffix}");
        let port = match lookup(&port_variable) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| CreditError::InvalidPort {
                    variable: port_variable,
                    value,
                })?,
            None => port,
        };

        Ok(Self {
            host,
            port,
            network: Network::select(test_mode, mijin),
        })
    }

    /// Base URL of the node's HTTP interface.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
struct OwnedMosaics {
    #[serde(default)]
    data: Vec<OwnedMosaic>,
}

#[derive(Debug, Deserialize)]
struct OwnedMosaic {
    #[serde(rename = "mosaicId")]
    mosaic_id: MosaicId,
    quantity: u64,
}

#[derive(Debug, Deserialize)]
struct MosaicId {
    #[serde(rename = "namespaceId")]
    namespace_id: String,
    name: String,
}

impl MosaicId {
    fn is(&self, qualified: &str) -> bool {
        qualified
            .split_once(':')
            .is_some_and(|(namespace, name)| namespace == self.namespace_id && name == self.name)
    }
}

/// Extracts the heart count from an owned-mosaics listing.
///
/// Returns `None` when the account holds no hearts at all. When the listing
/// mentions the mosaic more than once the last entry wins.
pub fn parse_owned_mosaics(body: &str) -> Result<Option<u64>, CreditError> {
    let listing: OwnedMosaics = serde_json::from_str(body)?;
    Ok(listing
        .data
        .iter()
        .filter(|mosaic| mosaic.mosaic_id.is(HEART_MOSAIC))
        .map(|mosaic| mosaic.quantity)
        .last())
}

/// Source of a player's heart count.
pub trait HeartsLookup {
    /// Looks up how many hearts `address` holds.
    fn hearts_for(&self, address: &PlayerAddress) -> Result<Option<u64>, CreditError>;

    /// Checks that the service is up. Sources without a liveness check always pass.
    fn heartbeat(&self) -> Result<(), CreditError> {
        Ok(())
    }
}

/// Blocking client for a NEM node's HTTP interface.
#[derive(Debug)]
pub struct NemNodeLookup {
    client: reqwest::blocking::Client,
    settings: NodeSettings,
}

impl NemNodeLookup {
    /// Creates a client for the node described by `settings`.
    pub fn new(settings: NodeSettings) -> Result<Self, CreditError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(CreditError::Client)?;
        Ok(Self { client, settings })
    }

    /// Node this client talks to.
    #[must_use]
    pub fn settings(&self) -> &NodeSettings {
        &self.settings
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, CreditError> {
        let url = format!("{}{path}", self.settings.base_url());
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|source| CreditError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CreditError::Status {
                url,
                status: status.as_u16(),
            });
        }
        response
            .text()
            .map_err(|source| CreditError::Transport { url, source })
    }
}

impl HeartsLookup for NemNodeLookup {
    fn hearts_for(&self, address: &PlayerAddress) -> Result<Option<u64>, CreditError> {
        let body = self.get(
            "/account/mosaic/owned",
            &[("address", address.as_str())],
        )?;
        parse_owned_mosaics(&body)
    }

    fn heartbeat(&self) -> Result<(), CreditError> {
        let _ = self.get("/heartbeat", &[])?;
        Ok(())
    }
}

/// Background heart lookup whose result is collected between ticks.
#[derive(Debug)]
pub struct CreditFeed {
    receiver: Receiver<u32>,
}

impl CreditFeed {
    /// Starts looking up `address` on a background thread.
    ///
    /// The heartbeat runs on that thread too; a failed heartbeat is logged
    /// and the lookup is still attempted. Failures and accounts without hearts
    /// produce no update.
    pub fn spawn<L>(lookup: L, address: PlayerAddress) -> Self
    where
        L: HeartsLookup + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let _ = thread::spawn(move || {
            if let Err(error) = lookup.heartbeat() {
                warn!(%error, "node did not answer the heartbeat");
            }
            match lookup.hearts_for(&address) {
                Ok(Some(hearts)) => {
                    let hearts = u32::try_from(hearts).unwrap_or(u32::MAX);
                    let _ = sender.send(hearts);
                }
                Ok(None) => debug!(%address, "account holds no hearts"),
                Err(error) => debug!(%address, %error, "heart lookup failed"),
            }
        });
        Self { receiver }
    }

    /// Latest heart count reported since the previous call, if any.
    #[must_use]
    pub fn drain(&self) -> Option<u32> {
        self.receiver.try_iter().last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_lose_dashes_and_case() {
        let address = PlayerAddress::new("tdwz55-r5vihs-h5wwk6 ");
        assert_eq!(address.as_str(), "TDWZ55R5VIHSH5WWK6");
        assert_eq!(address.to_string(), "TDWZ55R5VIHSH5WWK6");
    }

    #[test]
    fn heart_quantity_is_read_from_the_listing() {
        let body = r#"{"data":[
            {"mosaicId":{"namespaceId":"nem","name":"xem"},"quantity":5000},
            {"mosaicId":{"namespaceId":"evias.pacnem","name":"heart"},"quantity":3}
        ]}"#;
        assert_eq!(parse_owned_mosaics(body).expect("valid listing"), Some(3));
    }

    #[test]
    fn last_heart_entry_wins() {
        let body = r#"{"data":[
            {"mosaicId":{"namespaceId":"evias.pacnem","name":"heart"},"quantity":1},
            {"mosaicId":{"namespaceId":"evias.pacnem","name":"heart"},"quantity":4}
        ]}"#;
        assert_eq!(parse_owned_mosaics(body).expect("valid listing"), Some(4));
    }

    #[test]
    fn missing_hearts_yield_none() {
        assert_eq!(
            parse_owned_mosaics(r#"{"data":[]}"#).expect("valid listing"),
            None
        );
        assert_eq!(parse_owned_mosaics("{}").expect("valid listing"), None);
        let cheese = r#"{"data":[{"mosaicId":{"namespaceId":"evias.pacnem","name":"cheese"},"quantity":9}]}"#;
        assert_eq!(parse_owned_mosaics(cheese).expect("valid listing"), None);
    }

    #[test]
    fn malformed_listing_is_a_decode_error() {
        assert!(matches!(
            parse_owned_mosaics("not json"),
            Err(CreditError::Decode(_))
        ));
    }

    #[test]
    fn network_labels_prefer_test_mode() {
        assert_eq!(Network::select(true, true).label(), "Testnet");
        assert_eq!(Network::select(false, true).label(), "Mijin");
        assert_eq!(Network::select(false, false).to_string(), "Mainnet");
    }

    #[test]
    fn overrides_use_the_test_suffix_in_test_mode() {
        let lookup = |name: &str| match name {
            "NEM_HOST_TEST" => Some("testnet.example".to_owned()),
            "NEM_PORT_TEST" => Some("7778".to_owned()),
            "NEM_HOST" => Some("mainnet.example".to_owned()),
            _ => None,
        };

        let test = NodeSettings::with_overrides("localhost", 7890, true, false, lookup)
            .expect("valid overrides");
        assert_eq!(test.host, "testnet.example");
        assert_eq!(test.port, 7778);
        assert_eq!(test.network, Network::Testnet);
        assert_eq!(test.base_url(), "http://testnet.example:7778");

        let main = NodeSettings::with_overrides("localhost", 7890, false, false, lookup)
            .expect("valid overrides");
        assert_eq!(main.host, "mainnet.example");
        assert_eq!(main.port, 7890);
    }

    #[test]
    fn invalid_port_override_is_rejected() {
        let error = NodeSettings::with_overrides("localhost", 7890, false, false, |name| {
            (name == "NEM_PORT").then(|| "seventy".to_owned())
        })
        .expect_err("port must be numeric");
        assert!(matches!(error, CreditError::InvalidPort { .. }));
    }
}
