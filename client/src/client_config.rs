/// Contains Config properties which will be used by the Client
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Runs without a server. Every permission check passes and unknown
    /// permissions are created as allowed on first use.
    pub offline_mode: bool,
}
