//! Registry service: the registry behind a lock, wired to its collaborators.
//!
//! ```text
//! Command
//!   ↓
//! 1. Take the write lock, read the clock
//!   ↓
//! 2. ProductRegistry::execute: handle, settle the creation fee, apply
//!   ↓
//! 3. Publish envelope to bus
//! ```
//!
//! Steps 1-3 run under one write lock, so mutations are serialized and readers only
//! ever observe committed states. A rejection in 2 leaves the registry untouched.
//! A failed publish is logged; the state change stands.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{error, info, warn};

use provreg_auth::AuthorityVerifier;
use provreg_core::{Clock, Principal, ProductId, RegistryError, RegistryResult};
use provreg_events::{EventBus, EventEnvelope, Subscription};
use provreg_products::{
    CallContext, ContentHash, FeeSettlement, NewProduct, Product, ProductRegistry, ProductUpdate,
    RegistryCommand, RegistryConfig, RegistryEvent, SetAuthorityContract, SetCreationFee,
    UpdateProduct,
};

pub type RegistryEnvelope = EventEnvelope<RegistryEvent>;

#[derive(Debug)]
pub struct RegistryService<C, A, S, B> {
    state: RwLock<ProductRegistry>,
    clock: C,
    authorities: A,
    settlement: S,
    bus: B,
    sequence: AtomicU64,
}

impl<C, A, S, B> RegistryService<C, A, S, B> {
    pub fn new(config: RegistryConfig, clock: C, authorities: A, settlement: S, bus: B) -> Self {
        Self {
            state: RwLock::new(ProductRegistry::new(config)),
            clock,
            authorities,
            settlement,
            bus,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn authorities(&self) -> &A {
        &self.authorities
    }

    pub fn settlement(&self) -> &S {
        &self.settlement
    }

    // Every check runs before the registry mutates, and the mutation itself cannot
    // fail, so a panic while the lock was held leaves no half-applied event.
    fn read(&self) -> RwLockReadGuard<'_, ProductRegistry> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProductRegistry> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_product(&self, id: ProductId) -> Option<Product> {
        self.read().get_product(id).cloned()
    }

    pub fn get_product_count(&self) -> u64 {
        self.read().get_product_count()
    }

    pub fn check_product_existence(&self, name: &str) -> bool {
        self.read().check_product_existence(name)
    }

    pub fn get_product_update(&self, id: ProductId) -> Option<ProductUpdate> {
        self.read().get_product_update(id).cloned()
    }

    pub fn product_id_by_hash(&self, hash: &ContentHash) -> Option<ProductId> {
        self.read().product_id_by_hash(hash)
    }

    pub fn creation_fee(&self) -> u64 {
        self.read().creation_fee()
    }

    pub fn max_products(&self) -> u64 {
        self.read().max_products()
    }

    pub fn authority_contract(&self) -> Option<Principal> {
        self.read().authority_contract().cloned()
    }

    /// Clear all registry state. Envelope sequence numbers keep counting.
    pub fn reset(&self) {
        self.write().reset();
        info!("registry reset");
    }
}

impl<C, A, S, B> RegistryService<C, A, S, B>
where
    A: AuthorityVerifier,
{
    pub fn is_verified_authority(&self, identity: &Principal) -> bool {
        self.authorities.is_verified_authority(identity)
    }
}

impl<C, A, S, B> RegistryService<C, A, S, B>
where
    C: Clock,
    A: AuthorityVerifier,
    S: FeeSettlement,
    B: EventBus<RegistryEnvelope>,
{
    pub fn subscribe(&self) -> Subscription<RegistryEnvelope> {
        self.bus.subscribe()
    }

    pub fn set_authority_contract(
        &self,
        caller: impl Into<Principal>,
        authority: impl Into<Principal>,
    ) -> RegistryResult<()> {
        let command = RegistryCommand::SetAuthorityContract(SetAuthorityContract {
            authority: authority.into(),
        });
        self.execute(caller, command).map(|_| ())
    }

    pub fn set_creation_fee(&self, caller: impl Into<Principal>, fee: u64) -> RegistryResult<()> {
        let command = RegistryCommand::SetCreationFee(SetCreationFee { fee });
        self.execute(caller, command).map(|_| ())
    }

    pub fn create_product(
        &self,
        caller: impl Into<Principal>,
        input: NewProduct,
    ) -> RegistryResult<ProductId> {
        self.run(caller, "create_product", |state, ctx| {
            state.execute_create(ctx, &input, &self.authorities, &self.settlement)
        })
        .map(|created| created.product_id)
    }

    pub fn update_product(
        &self,
        caller: impl Into<Principal>,
        product_id: ProductId,
        name: impl Into<String>,
        max_quantity: u64,
        description: impl Into<String>,
    ) -> RegistryResult<()> {
        let command = RegistryCommand::UpdateProduct(UpdateProduct {
            product_id,
            name: name.into(),
            max_quantity,
            description: description.into(),
        });
        self.execute(caller, command).map(|_| ())
    }

    /// Run one command through the full pipeline and return the committed event.
    pub fn execute(
        &self,
        caller: impl Into<Principal>,
        command: RegistryCommand,
    ) -> RegistryResult<RegistryEvent> {
        self.run(caller, command_name(&command), |state, ctx| {
            state.execute(&command, ctx, &self.authorities, &self.settlement)
        })
    }

    // Settlement and rollback live in `ProductRegistry`; this only adds the lock,
    // the clock, logging and publication.
    fn run<E>(
        &self,
        caller: impl Into<Principal>,
        command: &'static str,
        op: impl FnOnce(&mut ProductRegistry, &CallContext) -> RegistryResult<E>,
    ) -> RegistryResult<E>
    where
        E: Clone + Into<RegistryEvent>,
    {
        let mut state = self.write();
        let ctx = CallContext::new(caller, self.clock.now());

        let committed = match op(&mut *state, &ctx) {
            Ok(committed) => committed,
            Err(err @ RegistryError::Settlement(_)) => {
                error!(
                    command,
                    caller = %ctx.caller,
                    code = err.code(),
                    error = %err,
                    "creation fee settlement failed"
                );
                return Err(err);
            }
            Err(err) => {
                warn!(
                    command,
                    caller = %ctx.caller,
                    code = err.code(),
                    error = %err,
                    "registry command rejected"
                );
                return Err(err);
            }
        };

        let event: RegistryEvent = committed.clone().into();
        log_committed(&event, &ctx);

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        if let Err(err) = self.bus.publish(EventEnvelope::wrap(sequence, event)) {
            warn!(sequence, error = ?err, "failed to publish registry event");
        }

        Ok(committed)
    }
}

fn command_name(command: &RegistryCommand) -> &'static str {
    match command {
        RegistryCommand::SetAuthorityContract(_) => "set_authority_contract",
        RegistryCommand::SetCreationFee(_) => "set_creation_fee",
        RegistryCommand::CreateProduct(_) => "create_product",
        RegistryCommand::UpdateProduct(_) => "update_product",
    }
}

fn log_committed(event: &RegistryEvent, ctx: &CallContext) {
    match event {
        RegistryEvent::AuthorityContractBound(e) => {
            info!(caller = %ctx.caller, authority = %e.authority, "authority contract bound");
        }
        RegistryEvent::CreationFeeChanged(e) => {
            info!(caller = %ctx.caller, fee = e.fee, "creation fee changed");
        }
        RegistryEvent::ProductCreated(e) => {
            info!(
                product_id = %e.product_id,
                caller = %ctx.caller,
                fee = e.fee,
                "product created"
            );
        }
        RegistryEvent::ProductUpdated(e) => {
            info!(
                product_id = %e.product_id,
                caller = %ctx.caller,
                renamed = e.previous_name != e.update.update_name,
                "product updated"
            );
        }
    }
}
