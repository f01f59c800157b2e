/// External API clients
pub mod openfda;

pub use openfda::OpenFdaClient;
