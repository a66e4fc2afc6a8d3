//! Data types shared by the request and response processors

pub mod authorization;
pub mod credentials;
pub mod request;

pub use authorization::{
    AuthorizationEntry, AuthorizationMethod, BasicConfig, ClientCertificateConfig, NtlmConfig,
    OAuth2Config,
};
pub use credentials::{AuthScheme, CachedCredential, Credential};
pub use request::{
    CertificateType, ClientCertificate, ExecutedRequest, ProcessingOutcome, RequestDescriptor,
    ResponseDescriptor,
};
