use russh::keys::ssh_key::PublicKey;

/// We crawl devices we already trust by hostname/address from the operator's
/// own configuration; there is no known-hosts file to consult, so every
/// server key is accepted. This mirrors the original tool's behavior, which
/// never verified host keys either.
pub struct ClientHandler;

impl russh::client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(&mut self, _server_public_key: &PublicKey) -> Result<bool, Self::Error> {
        Ok(true)
    }
}
