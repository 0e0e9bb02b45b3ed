//! Gateway configuration validated once at construction.
//!
//! The hosting runtime hands over an environment-style key/value map; every required
//! value is checked here, so handlers never re-discover a missing secret per request.
//! Blank values count as missing, matching how environment variables actually fail.

// self
use crate::{_prelude::*, auth::secret::SecretString, error::ConfigError};

/// Token validation strategy selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
	#[default]
	/// Local claim check (issuer, expiry, audience).
	Local,
	/// Remote introspection with a local expiry re-check.
	Remote,
}
impl FromStr for ValidationMode {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			value if value.eq_ignore_ascii_case("local") => Ok(Self::Local),
			value if value.eq_ignore_ascii_case("remote") => Ok(Self::Remote),
			value => Err(ConfigError::UnknownValidationMode { value: value.to_owned() }),
		}
	}
}

/// Immutable configuration bundle consumed by the gateway.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
	/// Provider token endpoint used for authorization-code exchanges.
	pub token_endpoint: Url,
	/// OAuth 2.0 client identifier; also the expected token audience.
	pub client_id: String,
	/// Confidential client secret sent during exchanges.
	pub client_secret: SecretString,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Url,
	/// Object-storage bucket receiving uploads.
	pub bucket_name: String,
	/// Bucket holding the CDN signing key object.
	pub key_bucket_name: String,
	/// CDN distribution domain fronting the image bucket.
	pub domain_name: String,
	/// CDN key-pair identifier matching the signing key.
	pub key_pair_id: String,
	/// Storage region for presigning and key fetches.
	pub region: String,
	/// Selected token validation strategy.
	pub validation_mode: ValidationMode,
	/// Introspection endpoint, required when [`ValidationMode::Remote`] is selected.
	pub introspection_endpoint: Option<Url>,
}
impl GatewayConfig {
	/// Creates a new builder.
	pub fn builder() -> GatewayConfigBuilder {
		GatewayConfigBuilder::default()
	}

	/// Builds a configuration from an environment-style key/value map.
	pub fn from_env_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
		let mut builder = Self::builder()
			.token_endpoint(required_url(vars, "endpoint")?)
			.client_id(required(vars, "clientId")?)
			.client_secret(required(vars, "clientSecret")?)
			.redirect_uri(required_url(vars, "redirectUri")?)
			.bucket_name(required(vars, "bucketName")?)
			.key_bucket_name(required(vars, "keyBucketName")?)
			.domain_name(required(vars, "domainName")?)
			.key_pair_id(required(vars, "publicKeyId")?)
			.region(required(vars, "region")?);

		if let Some(mode) = optional(vars, "validationMode") {
			builder = builder.validation_mode(mode.parse()?);
		}
		if let Some(endpoint) = optional(vars, "introspectionEndpoint") {
			builder = builder.introspection_endpoint(parse_url("introspectionEndpoint", endpoint)?);
		}

		builder.build()
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.validation_mode == ValidationMode::Remote && self.introspection_endpoint.is_none()
		{
			return Err(ConfigError::MissingIntrospectionEndpoint);
		}

		Ok(())
	}
}

/// Builder for [`GatewayConfig`] values.
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
	token_endpoint: Option<Url>,
	client_id: Option<String>,
	client_secret: Option<SecretString>,
	redirect_uri: Option<Url>,
	bucket_name: Option<String>,
	key_bucket_name: Option<String>,
	domain_name: Option<String>,
	key_pair_id: Option<String>,
	region: Option<String>,
	validation_mode: ValidationMode,
	introspection_endpoint: Option<Url>,
}
impl GatewayConfigBuilder {
	/// Sets the provider token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, value: impl Into<String>) -> Self {
		self.client_secret = Some(SecretString::new(value));

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Sets the upload bucket name.
	pub fn bucket_name(mut self, value: impl Into<String>) -> Self {
		self.bucket_name = Some(value.into());

		self
	}

	/// Sets the key bucket name.
	pub fn key_bucket_name(mut self, value: impl Into<String>) -> Self {
		self.key_bucket_name = Some(value.into());

		self
	}

	/// Sets the CDN domain name.
	pub fn domain_name(mut self, value: impl Into<String>) -> Self {
		self.domain_name = Some(value.into());

		self
	}

	/// Sets the CDN key-pair identifier.
	pub fn key_pair_id(mut self, value: impl Into<String>) -> Self {
		self.key_pair_id = Some(value.into());

		self
	}

	/// Sets the storage region.
	pub fn region(mut self, value: impl Into<String>) -> Self {
		self.region = Some(value.into());

		self
	}

	/// Overrides the validation mode (defaults to [`ValidationMode::Local`]).
	pub fn validation_mode(mut self, mode: ValidationMode) -> Self {
		self.validation_mode = mode;

		self
	}

	/// Sets the introspection endpoint used by the remote mode.
	pub fn introspection_endpoint(mut self, url: Url) -> Self {
		self.introspection_endpoint = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<GatewayConfig, ConfigError> {
		let config = GatewayConfig {
			token_endpoint: self
				.token_endpoint
				.ok_or(ConfigError::MissingValue { name: "endpoint" })?,
			client_id: self.client_id.ok_or(ConfigError::MissingValue { name: "clientId" })?,
			client_secret: self
				.client_secret
				.ok_or(ConfigError::MissingValue { name: "clientSecret" })?,
			redirect_uri: self
				.redirect_uri
				.ok_or(ConfigError::MissingValue { name: "redirectUri" })?,
			bucket_name: self
				.bucket_name
				.ok_or(ConfigError::MissingValue { name: "bucketName" })?,
			key_bucket_name: self
				.key_bucket_name
				.ok_or(ConfigError::MissingValue { name: "keyBucketName" })?,
			domain_name: self
				.domain_name
				.ok_or(ConfigError::MissingValue { name: "domainName" })?,
			key_pair_id: self
				.key_pair_id
				.ok_or(ConfigError::MissingValue { name: "publicKeyId" })?,
			region: self.region.ok_or(ConfigError::MissingValue { name: "region" })?,
			validation_mode: self.validation_mode,
			introspection_endpoint: self.introspection_endpoint,
		};

		config.validate()?;

		Ok(config)
	}
}

fn optional<'a>(vars: &'a HashMap<String, String>, name: &'static str) -> Option<&'a str> {
	vars.get(name).map(String::as_str).map(str::trim).filter(|value| !value.is_empty())
}

fn required<'a>(
	vars: &'a HashMap<String, String>,
	name: &'static str,
) -> Result<&'a str, ConfigError> {
	optional(vars, name).ok_or(ConfigError::MissingValue { name })
}

fn required_url(vars: &HashMap<String, String>, name: &'static str) -> Result<Url, ConfigError> {
	parse_url(name, required(vars, name)?)
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
	Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn env() -> HashMap<String, String> {
		[
			("endpoint", "https://auth.example.com/oauth2/token"),
			("clientId", "client-1"),
			("clientSecret", "secret-1"),
			("redirectUri", "http://localhost:3000"),
			("bucketName", "image-bucket"),
			("keyBucketName", "key-bucket"),
			("domainName", "images.example.com"),
			("publicKeyId", "KPAIRID"),
			("region", "ap-northeast-1"),
		]
		.into_iter()
		.map(|(key, value)| (key.to_owned(), value.to_owned()))
		.collect()
	}

	#[test]
	fn full_environment_builds() {
		let config = GatewayConfig::from_env_map(&env())
			.expect("Complete environment should build a configuration.");

		assert_eq!(config.client_id, "client-1");
		assert_eq!(config.validation_mode, ValidationMode::Local);
	}

	#[test]
	fn missing_client_secret_is_a_construction_error() {
		let mut vars = env();

		vars.remove("clientSecret");

		let err = GatewayConfig::from_env_map(&vars).unwrap_err();

		assert!(matches!(err, ConfigError::MissingValue { name: "clientSecret" }));
		assert_eq!(Error::from(err).status_code(), 500);
	}

	#[test]
	fn blank_values_count_as_missing() {
		let mut vars = env();

		vars.insert("endpoint".to_owned(), "   ".to_owned());

		assert!(matches!(
			GatewayConfig::from_env_map(&vars),
			Err(ConfigError::MissingValue { name: "endpoint" }),
		));
	}

	#[test]
	fn remote_mode_requires_an_introspection_endpoint() {
		let mut vars = env();

		vars.insert("validationMode".to_owned(), "remote".to_owned());

		assert!(matches!(
			GatewayConfig::from_env_map(&vars),
			Err(ConfigError::MissingIntrospectionEndpoint),
		));

		vars.insert(
			"introspectionEndpoint".to_owned(),
			"https://oauth2.example.com/tokeninfo".to_owned(),
		);

		let config = GatewayConfig::from_env_map(&vars)
			.expect("Remote mode with an endpoint should build.");

		assert_eq!(config.validation_mode, ValidationMode::Remote);
	}

	#[test]
	fn unknown_validation_modes_are_rejected() {
		let mut vars = env();

		vars.insert("validationMode".to_owned(), "hybrid".to_owned());

		assert!(matches!(
			GatewayConfig::from_env_map(&vars),
			Err(ConfigError::UnknownValidationMode { .. }),
		));
	}
}
