use crate::attributes::{AttributeRepository, Attributes};
use crate::credential::{
    CredentialDefinition, CredentialDefinitionId, CredentialDefinitionPublic, CredentialRequest,
    IssuedCredential,
};
use crate::error::Error;
use crate::params::CredentialParameters;
use crate::revocation_registry::{AccumulatorState, PublishedRegistry};
use crate::ClResult;
use blsful::inner_types::G1Projective;
use log::debug;
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use std::collections::BTreeMap;
use std::sync::Arc;

/// An issuer of credentials across any number of credential definitions.
///
/// Every definition and its accumulator is owned here, mutations need
/// `&mut self` so they are serialized per issuer.
pub struct Issuer {
    params: CredentialParameters,
    definitions: BTreeMap<CredentialDefinitionId, CredentialDefinition>,
    by_attributes: BTreeMap<Vec<String>, Vec<CredentialDefinitionId>>,
    repository: Option<Arc<dyn AttributeRepository>>,
}

impl std::fmt::Debug for Issuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Issuer")
            .field("params", &self.params)
            .field("definitions", &self.definitions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Issuer {
    fn default() -> Self {
        Self::new(CredentialParameters::default())
    }
}

impl Issuer {
    /// Create an issuer using `params` for every new definition
    pub fn new(params: CredentialParameters) -> Self {
        Self {
            params,
            definitions: BTreeMap::new(),
            by_attributes: BTreeMap::new(),
            repository: None,
        }
    }

    /// Create an issuer that reads attribute values from `repository`
    pub fn with_repository(
        params: CredentialParameters,
        repository: Arc<dyn AttributeRepository>,
    ) -> Self {
        Self {
            repository: Some(repository),
            ..Self::new(params)
        }
    }

    /// The parameters applied to new definitions
    pub fn params(&self) -> &CredentialParameters {
        &self.params
    }

    /// Generate and register a new credential definition
    pub fn add_credential_definition<S: AsRef<str>>(
        &mut self,
        name: &str,
        version: &str,
        attribute_names: &[S],
        rng: impl RngCore + CryptoRng,
    ) -> ClResult<Arc<CredentialDefinitionPublic>> {
        let id = self.unused_id(name, version)?;
        let definition = CredentialDefinition::new(id, attribute_names, self.params, rng)?;
        Ok(self.register(definition))
    }

    /// Register a new credential definition over known Sophie-Germain primes
    pub fn add_credential_definition_with_factors<S: AsRef<str>>(
        &mut self,
        name: &str,
        version: &str,
        attribute_names: &[S],
        p_prime: BigUint,
        q_prime: BigUint,
        rng: impl RngCore + CryptoRng,
    ) -> ClResult<Arc<CredentialDefinitionPublic>> {
        let id = self.unused_id(name, version)?;
        let definition = CredentialDefinition::from_factors(
            id,
            attribute_names,
            p_prime,
            q_prime,
            self.params,
            rng,
        )?;
        Ok(self.register(definition))
    }

    fn unused_id(&self, name: &str, version: &str) -> ClResult<CredentialDefinitionId> {
        let id = CredentialDefinitionId::new(name, version);
        if self.definitions.contains_key(&id) {
            return Err(Error::InvalidInput("credential definition already exists"));
        }
        Ok(id)
    }

    fn register(&mut self, definition: CredentialDefinition) -> Arc<CredentialDefinitionPublic> {
        let public = definition.public().clone();
        self.by_attributes
            .entry(public.attribute_names.clone())
            .or_default()
            .push(public.id.clone());
        self.definitions.insert(public.id.clone(), definition);
        debug!("registered credential definition {}", public.id);
        public
    }

    /// Look up a definition by name and version
    pub fn credential_definition(&self, name: &str, version: &str) -> ClResult<&CredentialDefinition> {
        let id = CredentialDefinitionId::new(name, version);
        self.definitions
            .get(&id)
            .ok_or_else(|| Error::LookupFailed(id.to_string()))
    }

    /// The most recently registered definition over exactly `attribute_names`
    pub fn find_credential_definition<S: AsRef<str>>(
        &self,
        attribute_names: &[S],
    ) -> ClResult<&CredentialDefinition> {
        let id = self.find_id(attribute_names)?;
        self.definitions
            .get(&id)
            .ok_or_else(|| Error::LookupFailed(id.to_string()))
    }

    fn find_id<S: AsRef<str>>(&self, attribute_names: &[S]) -> ClResult<CredentialDefinitionId> {
        let mut key: Vec<String> = attribute_names
            .iter()
            .map(|n| n.as_ref().to_string())
            .collect();
        key.sort();
        self.by_attributes
            .get(&key)
            .and_then(|ids| ids.last())
            .cloned()
            .ok_or_else(|| Error::LookupFailed(format!("attributes {:?}", key)))
    }

    fn definition_mut(&mut self, id: &CredentialDefinitionId) -> ClResult<&mut CredentialDefinition> {
        self.definitions
            .get_mut(id)
            .ok_or_else(|| Error::LookupFailed(id.to_string()))
    }

    /// Blind sign `attributes` for the holder that sent `request`
    pub fn issue(
        &mut self,
        id: &CredentialDefinitionId,
        request: &CredentialRequest,
        attributes: &Attributes,
        rng: impl RngCore + CryptoRng,
    ) -> ClResult<IssuedCredential> {
        self.definition_mut(id)?.issue(
            &request.holder_id,
            attributes.encoded(),
            Some(&request.u),
            request.ur,
            rng,
        )
    }

    /// Sign `attributes` with no holder blinding.
    ///
    /// The issuer learns the complete credential, see [`crate::knox::cl::Issuer::sign`].
    pub fn issue_unblinded(
        &mut self,
        id: &CredentialDefinitionId,
        holder_id: &str,
        attributes: &Attributes,
        rng: impl RngCore + CryptoRng,
    ) -> ClResult<IssuedCredential> {
        self.definition_mut(id)?.issue(
            holder_id,
            attributes.encoded(),
            None,
            G1Projective::IDENTITY,
            rng,
        )
    }

    /// Issue under (`name`, `version`) using the holder's attributes from the repository
    pub fn create_credential(
        &mut self,
        name: &str,
        version: &str,
        request: &CredentialRequest,
        rng: impl RngCore + CryptoRng,
    ) -> ClResult<IssuedCredential> {
        let attributes = self.repository_attributes(&request.holder_id)?;
        let id = CredentialDefinitionId::new(name, version);
        self.issue(&id, request, &attributes, rng)
    }

    /// Issue under the latest definition matching the holder's attribute names
    pub fn create_credential_for_attributes(
        &mut self,
        request: &CredentialRequest,
        rng: impl RngCore + CryptoRng,
    ) -> ClResult<IssuedCredential> {
        let attributes = self.repository_attributes(&request.holder_id)?;
        let id = self.find_id(&attributes.names())?;
        self.issue(&id, request, &attributes, rng)
    }

    fn repository_attributes(&self, holder_id: &str) -> ClResult<Attributes> {
        self.repository
            .as_ref()
            .ok_or(Error::InvalidInput("no attribute repository configured"))?
            .get_attributes(holder_id)
    }

    /// Permanently revoke the credential at `index`
    pub fn revoke(&mut self, id: &CredentialDefinitionId, index: u32) -> ClResult<()> {
        self.definition_mut(id)?.revoke(index)
    }

    /// The current accumulator state of a definition
    pub fn accumulator_state(&self, id: &CredentialDefinitionId) -> ClResult<AccumulatorState> {
        self.credential_definition(&id.name, &id.version)
            .map(|d| d.accumulator_state().clone())
    }

    /// Publish the accumulator and delta log of a definition
    pub fn publish(&self, id: &CredentialDefinitionId) -> ClResult<PublishedRegistry> {
        self.credential_definition(&id.name, &id.version)
            .map(CredentialDefinition::publish)
    }
}
