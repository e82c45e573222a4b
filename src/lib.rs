//! Lambda handlers for a CORS-aware secrets API and for redeploying a
//! function when a new code artifact is uploaded.

pub mod config;
pub mod deploy;
pub mod error;
pub mod events;
pub mod gate;
pub mod probe;
pub mod runtime;
pub mod server;

pub use config::{Config, CorsConfig, DeployerConfig, ProbeConfig};
pub use deploy::{CodeDeployer, DeploymentReport, Redeployer};
pub use error::{AppError, AppResult};
pub use events::{ApiGatewayRequest, ApiGatewayResponse, ObjectKey, ObjectKeys, UploadNotification};
pub use gate::RequestGate;
pub use probe::{ProbeFailure, ProbeReport, SecretProbe};
