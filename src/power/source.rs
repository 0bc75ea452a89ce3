use crate::power::client::PowerClient;
use crate::power::error::PowerApiError;
use crate::power::request::PowerRequest;
use crate::power::response::Payload;
use std::future::Future;

/// Anything that can answer POWER requests.
///
/// [`PowerClient`] is the production implementation; tests substitute canned payloads.
pub trait IrradianceSource {
    fn fetch(
        &self,
        request: &PowerRequest,
    ) -> impl Future<Output = Result<Payload, PowerApiError>> + Send;
}

impl IrradianceSource for PowerClient {
    async fn fetch(&self, request: &PowerRequest) -> Result<Payload, PowerApiError> {
        self.fetch_payload(request).await
    }
}
