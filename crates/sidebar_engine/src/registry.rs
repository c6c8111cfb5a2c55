use rand::distr::Alphanumeric;
use rand::Rng;
use sidebar_core::ClientId;

const SUFFIX_LEN: usize = 9;

/// Holds the one identity of this session.
///
/// Created once at startup; reconnects reuse it, so backend responses for
/// any connection of this session can be correlated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRegistry {
    client_id: ClientId,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            client_id: generate_client_id(),
        }
    }

    /// Uses a known identity instead of generating one.
    pub fn with_client_id(client_id: ClientId) -> Self {
        Self { client_id }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// `client_<unix millis>_<random lowercase alphanumerics>`.
fn generate_client_id() -> ClientId {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();
    ClientId::new(format!("client_{millis}_{suffix}"))
}
