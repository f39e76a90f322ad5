//! The product registry: configuration, primary store, audit store and the two
//! uniqueness indexes, mutated only through events.
//!
//! - **Decision logic**: `handle(&self, ..)` runs the full check chain and returns
//!   the event describing the change, stamped with the current `version()`. It
//!   never mutates.
//! - **State mutation**: `apply(&mut self, ..)` commits an event. An event decided
//!   against any other version is rejected as stale and changes nothing.
//!
//! A creation's fee is settled between the two steps, so a failed transfer leaves
//! the registry exactly as it was.

use std::collections::HashMap;

use provreg_auth::AuthorityVerifier;
use provreg_core::{Principal, ProductId, RegistryError, RegistryResult};

use crate::command::{
    CallContext, RegistryCommand, SetAuthorityContract, SetCreationFee, UpdateProduct,
};
use crate::config::RegistryConfig;
use crate::event::{
    AuthorityContractBound, CreationFeeChanged, ProductCreated, ProductUpdated, RegistryEvent,
};
use crate::product::{ContentHash, NewProduct, Product, ProductUpdate};
use crate::settlement::FeeSettlement;
use crate::validation::{validate_new_product, validate_update};

/// Registry state. One instance per registry; no ambient singleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRegistry {
    initial: RegistryConfig,
    next_product_id: u64,
    max_products: u64,
    creation_fee: u64,
    authority_contract: Option<Principal>,
    products: HashMap<ProductId, Product>,
    product_updates: HashMap<ProductId, ProductUpdate>,
    products_by_name: HashMap<String, ProductId>,
    products_by_hash: HashMap<ContentHash, ProductId>,
    version: u64,
}

impl Default for ProductRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl ProductRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            initial: config,
            next_product_id: 0,
            max_products: config.max_products,
            creation_fee: config.creation_fee,
            authority_contract: None,
            products: HashMap::new(),
            product_updates: HashMap::new(),
            products_by_name: HashMap::new(),
            products_by_hash: HashMap::new(),
            version: 0,
        }
    }

    /// Drop every record and binding, returning to the configuration this
    /// registry was constructed with.
    pub fn reset(&mut self) {
        *self = Self::new(self.initial);
    }

    /// Number of events applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn creation_fee(&self) -> u64 {
        self.creation_fee
    }

    pub fn max_products(&self) -> u64 {
        self.max_products
    }

    pub fn authority_contract(&self) -> Option<&Principal> {
        self.authority_contract.as_ref()
    }

    pub fn get_product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Products ever created (ids handed out), not products currently indexed.
    pub fn get_product_count(&self) -> u64 {
        self.next_product_id
    }

    pub fn check_product_existence(&self, name: &str) -> bool {
        self.products_by_name.contains_key(name)
    }

    pub fn get_product_update(&self, id: ProductId) -> Option<&ProductUpdate> {
        self.product_updates.get(&id)
    }

    pub fn product_id_by_name(&self, name: &str) -> Option<ProductId> {
        self.products_by_name.get(name).copied()
    }

    pub fn product_id_by_hash(&self, hash: &ContentHash) -> Option<ProductId> {
        self.products_by_hash.get(hash).copied()
    }

    /// Decide the event for `command` without touching state.
    pub fn handle<A>(
        &self,
        command: &RegistryCommand,
        ctx: &CallContext,
        authorities: &A,
    ) -> RegistryResult<RegistryEvent>
    where
        A: AuthorityVerifier + ?Sized,
    {
        match command {
            RegistryCommand::SetAuthorityContract(cmd) => {
                self.handle_set_authority(cmd, ctx).map(Into::into)
            }
            RegistryCommand::SetCreationFee(cmd) => self.handle_set_fee(cmd, ctx).map(Into::into),
            RegistryCommand::CreateProduct(input) => {
                self.handle_create(input, ctx, authorities).map(Into::into)
            }
            RegistryCommand::UpdateProduct(cmd) => self.handle_update(cmd, ctx).map(Into::into),
        }
    }

    /// Commit an event produced by `handle` at the current version.
    ///
    /// Does not settle fees; use `execute` for creations that must be paid for.
    pub fn apply(&mut self, event: &RegistryEvent) -> RegistryResult<()> {
        self.ensure_current(event)?;
        self.mutate(event);
        Ok(())
    }

    /// Handle, settle any creation fee, then apply.
    pub fn execute<A, S>(
        &mut self,
        command: &RegistryCommand,
        ctx: &CallContext,
        authorities: &A,
        settlement: &S,
    ) -> RegistryResult<RegistryEvent>
    where
        A: AuthorityVerifier + ?Sized,
        S: FeeSettlement + ?Sized,
    {
        let event = self.handle(command, ctx, authorities)?;
        self.commit(event, settlement)
    }

    /// Create a product, settle its fee and return the committed event.
    pub fn execute_create<A, S>(
        &mut self,
        ctx: &CallContext,
        input: &NewProduct,
        authorities: &A,
        settlement: &S,
    ) -> RegistryResult<ProductCreated>
    where
        A: AuthorityVerifier + ?Sized,
        S: FeeSettlement + ?Sized,
    {
        let created = self.handle_create(input, ctx, authorities)?;
        self.commit(created, settlement)
    }

    pub fn set_authority_contract(
        &mut self,
        ctx: &CallContext,
        authority: Principal,
    ) -> RegistryResult<()> {
        let event = self.handle_set_authority(&SetAuthorityContract { authority }, ctx)?;
        self.apply(&event.into())
    }

    pub fn set_creation_fee(&mut self, ctx: &CallContext, fee: u64) -> RegistryResult<()> {
        let event = self.handle_set_fee(&SetCreationFee { fee }, ctx)?;
        self.apply(&event.into())
    }

    pub fn create_product<A, S>(
        &mut self,
        ctx: &CallContext,
        input: &NewProduct,
        authorities: &A,
        settlement: &S,
    ) -> RegistryResult<ProductId>
    where
        A: AuthorityVerifier + ?Sized,
        S: FeeSettlement + ?Sized,
    {
        self.execute_create(ctx, input, authorities, settlement)
            .map(|created| created.product_id)
    }

    pub fn update_product(&mut self, ctx: &CallContext, cmd: &UpdateProduct) -> RegistryResult<()> {
        let event = self.handle_update(cmd, ctx)?;
        self.apply(&event.into())
    }

    /// The only path that settles fees: stale check, transfer, then mutate.
    fn commit<E, S>(&mut self, event: E, settlement: &S) -> RegistryResult<E>
    where
        E: Clone + Into<RegistryEvent>,
        S: FeeSettlement + ?Sized,
    {
        let committed: RegistryEvent = event.clone().into();
        self.ensure_current(&committed)?;
        if let RegistryEvent::ProductCreated(created) = &committed {
            settlement.transfer(created.fee, &created.payer, &created.payee)?;
        }
        self.mutate(&committed);
        Ok(event)
    }

    fn ensure_current(&self, event: &RegistryEvent) -> RegistryResult<()> {
        let decided_at = event.registry_version();
        if decided_at != self.version {
            return Err(RegistryError::StaleEvent {
                decided_at,
                current: self.version,
            });
        }
        if let RegistryEvent::ProductUpdated(e) = event {
            if !self.products.contains_key(&e.product_id) {
                return Err(RegistryError::NotFound);
            }
        }
        Ok(())
    }

    // Callers must have passed `ensure_current` for this exact event.
    fn mutate(&mut self, event: &RegistryEvent) {
        match event {
            RegistryEvent::AuthorityContractBound(e) => {
                self.authority_contract = Some(e.authority.clone());
            }
            RegistryEvent::CreationFeeChanged(e) => {
                self.creation_fee = e.fee;
            }
            RegistryEvent::ProductCreated(e) => {
                self.products_by_name
                    .insert(e.product.name().to_string(), e.product_id);
                self.products_by_hash.insert(*e.product.hash(), e.product_id);
                self.products.insert(e.product_id, e.product.clone());
                self.next_product_id = e.product_id.value() + 1;
            }
            RegistryEvent::ProductUpdated(e) => {
                let Some(product) = self.products.get_mut(&e.product_id) else {
                    return;
                };
                if e.previous_name != e.update.update_name {
                    self.products_by_name.remove(&e.previous_name);
                    self.products_by_name
                        .insert(e.update.update_name.clone(), e.product_id);
                }
                product.apply_update(&e.update);
                self.product_updates.insert(e.product_id, e.update.clone());
            }
        }

        self.version += 1;
    }

    fn handle_set_authority(
        &self,
        cmd: &SetAuthorityContract,
        ctx: &CallContext,
    ) -> RegistryResult<AuthorityContractBound> {
        if cmd.authority.is_null() {
            return Err(RegistryError::InvalidAuthorityIdentity);
        }
        if self.authority_contract.is_some() {
            return Err(RegistryError::AuthorityAlreadyBound);
        }

        Ok(AuthorityContractBound {
            registry_version: self.version,
            authority: cmd.authority.clone(),
            occurred_at: ctx.now,
        })
    }

    fn handle_set_fee(
        &self,
        cmd: &SetCreationFee,
        ctx: &CallContext,
    ) -> RegistryResult<CreationFeeChanged> {
        if self.authority_contract.is_none() {
            return Err(RegistryError::AuthorityNotVerified);
        }

        Ok(CreationFeeChanged {
            registry_version: self.version,
            fee: cmd.fee,
            occurred_at: ctx.now,
        })
    }

    fn handle_create<A>(
        &self,
        input: &NewProduct,
        ctx: &CallContext,
        authorities: &A,
    ) -> RegistryResult<ProductCreated>
    where
        A: AuthorityVerifier + ?Sized,
    {
        if self.next_product_id >= self.max_products {
            return Err(RegistryError::MaxProductsExceeded);
        }

        let validated = validate_new_product(input, ctx.now)?;

        if !authorities.is_verified_authority(&ctx.caller) {
            return Err(RegistryError::NotAuthorized);
        }
        if self.products_by_name.contains_key(&validated.name) {
            return Err(RegistryError::ProductAlreadyExists);
        }
        if self.products_by_hash.contains_key(&validated.hash) {
            return Err(RegistryError::ProductAlreadyExists);
        }
        let Some(authority) = &self.authority_contract else {
            return Err(RegistryError::AuthorityNotVerified);
        };

        let product_id = ProductId::new(self.next_product_id);
        let product = Product::from_validated(product_id, validated, ctx.caller.clone(), ctx.now);

        Ok(ProductCreated {
            registry_version: self.version,
            product_id,
            product,
            fee: self.creation_fee,
            payer: ctx.caller.clone(),
            payee: authority.clone(),
            occurred_at: ctx.now,
        })
    }

    fn handle_update(&self, cmd: &UpdateProduct, ctx: &CallContext) -> RegistryResult<ProductUpdated> {
        let product = self
            .products
            .get(&cmd.product_id)
            .ok_or(RegistryError::NotFound)?;

        if product.creator() != &ctx.caller {
            return Err(RegistryError::NotAuthorized);
        }

        validate_update(&cmd.name, cmd.max_quantity, &cmd.description)?;

        if let Some(owner) = self.products_by_name.get(&cmd.name) {
            if *owner != cmd.product_id {
                return Err(RegistryError::ProductAlreadyExists);
            }
        }

        Ok(ProductUpdated {
            registry_version: self.version,
            product_id: cmd.product_id,
            previous_name: product.name().to_string(),
            update: ProductUpdate {
                update_name: cmd.name.clone(),
                update_max_quantity: cmd.max_quantity,
                update_description: cmd.description.clone(),
                update_timestamp: ctx.now,
                updater: ctx.caller.clone(),
            },
            occurred_at: ctx.now,
        })
    }
}
