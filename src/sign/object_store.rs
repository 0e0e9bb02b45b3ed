//! SigV4 presigning against the upload bucket.
//!
//! Presigning is pure request signing: no network round-trip happens until the caller
//! uses the URL, so the only failure modes here are credential resolution and signature
//! computation.

// crates.io
use s3::{Bucket, Region, creds::Credentials};
// self
use crate::{
	_prelude::*,
	config::GatewayConfig,
	error::{ConfigError, SigningError},
};

/// Validity window in seconds applied to every upload URL.
pub const UPLOAD_URL_VALIDITY_SECS: u32 = 120;

/// Future alias returned by presigner calls.
pub type PresignFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, SigningError>> + 'a + Send>>;

/// Backend contract for object-storage presigning.
pub trait StoragePresigner: Send + Sync {
	/// Returns a time-limited PUT URL for `key`.
	fn presign_put<'a>(&'a self, key: &'a str, validity_secs: u32) -> PresignFuture<'a, Url>;
}

/// SigV4 presigner bound to one bucket, using delegated credentials.
///
/// No explicit key material is handled here; the credential chain (environment,
/// profile, instance role) supplies whatever the host grants.
pub struct S3Presigner {
	bucket: Box<Bucket>,
}
impl S3Presigner {
	/// Creates a presigner for the provided bucket/region/credentials triple.
	pub fn new(
		bucket_name: &str,
		region: Region,
		credentials: Credentials,
	) -> Result<Self, SigningError> {
		let bucket = Bucket::new(bucket_name, region, credentials).map_err(SigningError::presign)?;

		Ok(Self { bucket })
	}

	/// Creates a presigner for the configured upload bucket via the credential chain.
	pub fn from_config(config: &GatewayConfig) -> Result<Self> {
		let credentials = delegated_credentials()?;
		let region = parse_region(&config.region)?;

		Ok(Self::new(&config.bucket_name, region, credentials)?)
	}
}
impl StoragePresigner for S3Presigner {
	fn presign_put<'a>(&'a self, key: &'a str, validity_secs: u32) -> PresignFuture<'a, Url> {
		Box::pin(async move {
			let url = self
				.bucket
				.presign_put(key, validity_secs, None, None)
				.await
				.map_err(SigningError::presign)?;

			Url::parse(&url).map_err(|source| SigningError::UrlAssembly { source })
		})
	}
}
impl Debug for S3Presigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("S3Presigner").field("bucket", &self.bucket.name()).finish()
	}
}

/// Resolves credentials from the ambient chain (environment, profile, instance role).
pub fn delegated_credentials() -> Result<Credentials, ConfigError> {
	Credentials::default().map_err(|source| ConfigError::Credentials { source: Box::new(source) })
}

/// Parses a region string into the storage SDK's region type.
pub fn parse_region(value: &str) -> Result<Region, ConfigError> {
	value.parse().map_err(|source| ConfigError::InvalidRegion {
		value: value.to_owned(),
		source: Box::new(source),
	})
}
