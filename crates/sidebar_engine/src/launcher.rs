use sidebar_core::{JobKind, JobRequest};
use sidebar_logging::sidebar_debug;
use url::Url;

use crate::{EngineError, EngineSettings, LaunchError};

/// Starts backend jobs. Acceptance is all a launcher reports; job output
/// arrives on the socket.
#[async_trait::async_trait]
pub trait JobLauncher: Send + Sync {
    async fn launch(&self, request: &JobRequest) -> Result<(), LaunchError>;
}

#[derive(Debug, Clone)]
pub struct HttpJobLauncher {
    client: reqwest::Client,
    base: Url,
}

impl HttpJobLauncher {
    pub fn new(settings: &EngineSettings) -> Result<Self, EngineError> {
        let base = settings.api_base()?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::HttpClient(err.to_string()))?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, job: JobKind) -> Result<Url, LaunchError> {
        let path = match job {
            JobKind::Chat => "chat",
            JobKind::Research => "research",
            JobKind::Followup => "research/followup",
            JobKind::AutoTrade => "autotrade",
        };
        self.base
            .join(path)
            .map_err(|err| LaunchError::Network(err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobLauncher for HttpJobLauncher {
    async fn launch(&self, request: &JobRequest) -> Result<(), LaunchError> {
        let url = self.endpoint(request.kind())?;
        sidebar_debug!(
            "launching {} request {} at {}",
            request.kind(),
            request.request_id(),
            url
        );

        let builder = self.client.post(url);
        let builder = match request {
            JobRequest::Chat(body) => builder.json(body),
            JobRequest::Research(body) => builder.json(body),
            JobRequest::Followup(body) => builder.json(body),
            JobRequest::AutoTrade(body) => builder.json(body),
        };
        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LaunchError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> LaunchError {
    if err.is_timeout() {
        return LaunchError::Timeout;
    }
    LaunchError::Network(err.to_string())
}
