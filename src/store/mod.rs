//! Validated, persisted collection of process models.
use crate::error::{StoreError, ValidationError};
use crate::model::{
    IntoProcessModel, ModelCollection, ModelDocument, ModelId, ProcessModel, template,
};
use crate::validator::Validator;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

mod persistence;

pub use persistence::{JsonFilePersistence, MemoryPersistence, Persistence};

/// A stored entry that failed validation when the collection was loaded.
///
/// It is written back unchanged on every save until it is replaced or deleted.
#[derive(Debug, Clone)]
struct Rejected {
    document: ModelDocument,
    error: ValidationError,
}

#[derive(Debug, Clone, Default)]
struct Collection {
    models: BTreeMap<ModelId, ProcessModel>,
    rejected: BTreeMap<ModelId, Rejected>,
}

impl Collection {
    fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id) || self.rejected.contains_key(id)
    }

    fn to_documents(&self) -> ModelCollection {
        let accepted = self
            .models
            .values()
            .map(|m| (m.id.clone(), ModelDocument::from(m)));
        let rejected = self
            .rejected
            .iter()
            .map(|(id, r)| (id.clone(), r.document.clone()));
        accepted.chain(rejected).collect()
    }
}

/// Holds every accepted process model, keyed by id.
///
/// Each mutation validates its input, writes the whole updated collection
/// through the persistence collaborator and only then publishes it in memory,
/// all while holding the write lock. Readers share the read lock and always
/// see a complete collection.
///
/// Stored entries that do not validate on load are kept aside: they are not
/// listed or traversed, [`get`](Self::get) reports them as
/// [`StoreError::CorruptModel`], and they survive later saves untouched.
pub struct ProcessModelStore<P: Persistence> {
    persistence: P,
    state: RwLock<Collection>,
}

impl<P: Persistence> ProcessModelStore<P> {
    /// Loads the collection, validating every stored model.
    pub fn open(persistence: P) -> Result<Self, StoreError> {
        let mut state = Collection::default();
        for (id, document) in persistence.load()? {
            let outcome = document
                .clone()
                .into_process_model(&id)
                .and_then(|model| Validator::validate(&model).map(|_| model));
            match outcome {
                Ok(model) => {
                    state.models.insert(id, model);
                }
                Err(error) => {
                    warn!(
                        model = %id,
                        error = %error,
                        "stored process model is invalid, keeping it aside"
                    );
                    state.rejected.insert(id, Rejected { document, error });
                }
            }
        }
        info!(
            models = state.models.len(),
            rejected = state.rejected.len(),
            "opened process model store"
        );

        Ok(Self {
            persistence,
            state: RwLock::new(state),
        })
    }

    /// Like [`open`](Self::open), but seeds an empty collection with `seed`.
    pub fn open_or_seed(
        persistence: P,
        seed: impl FnOnce() -> Vec<ProcessModel>,
    ) -> Result<Self, StoreError> {
        let store = Self::open(persistence)?;
        let untouched = {
            let state = store.read();
            state.models.is_empty() && state.rejected.is_empty()
        };
        if untouched {
            for model in seed() {
                store.create(model)?;
            }
        }
        Ok(store)
    }

    /// Validates and inserts a new model.
    pub fn create(&self, model: ProcessModel) -> Result<ModelId, StoreError> {
        let mut state = self.write();
        if state.contains(&model.id) {
            return Err(StoreError::DuplicateId(model.id));
        }
        Validator::validate(&model).map_err(|source| StoreError::Validation {
            id: model.id.clone(),
            source,
        })?;

        let id = model.id.clone();
        let mut next = state.clone();
        next.models.insert(id.clone(), model);
        self.commit(&mut state, next)?;

        info!(model = %id, "created process model");
        Ok(id)
    }

    /// Replaces the graph and metadata of an existing model. The id and the
    /// original creation time are kept. Replacing an entry that was set aside
    /// on load puts a valid model in its place.
    pub fn replace(&self, id: &str, mut model: ProcessModel) -> Result<(), StoreError> {
        let mut state = self.write();
        let created_at = match (state.models.get(id), state.rejected.get(id)) {
            (Some(existing), _) => existing.created_at.clone(),
            (None, Some(rejected)) => rejected.document.created_at.clone(),
            (None, None) => return Err(StoreError::NotFound(id.to_string())),
        };
        model.id = id.to_string();
        model.created_at = created_at;

        Validator::validate(&model).map_err(|source| StoreError::Validation {
            id: id.to_string(),
            source,
        })?;

        let mut next = state.clone();
        next.rejected.remove(id);
        next.models.insert(model.id.clone(), model);
        self.commit(&mut state, next)?;

        info!(model = %id, "replaced process model");
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.write();
        if !state.contains(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let mut next = state.clone();
        next.models.remove(id);
        next.rejected.remove(id);
        self.commit(&mut state, next)?;

        info!(model = %id, "deleted process model");
        Ok(())
    }

    /// Instantiates a built-in template and stores the result.
    pub fn instantiate_template(&self, key: &str) -> Result<ModelId, StoreError> {
        let model = template(key)?.instantiate()?;
        self.create(model)
    }

    pub fn get(&self, id: &str) -> Result<ProcessModel, StoreError> {
        let state = self.read();
        if let Some(model) = state.models.get(id) {
            return Ok(model.clone());
        }
        match state.rejected.get(id) {
            Some(rejected) => Err(StoreError::CorruptModel {
                id: id.to_string(),
                source: rejected.error.clone(),
            }),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    /// All accepted models, ordered by id.
    pub fn list(&self) -> Vec<ProcessModel> {
        self.read().models.values().cloned().collect()
    }

    /// Accepted models of one process type, ordered by id.
    pub fn list_by_type(&self, process_type: &str) -> Vec<ProcessModel> {
        self.read()
            .models
            .values()
            .filter(|m| m.process_type == process_type)
            .cloned()
            .collect()
    }

    /// Stored entries that failed validation on load, with the reason.
    pub fn rejected(&self) -> Vec<(ModelId, ValidationError)> {
        self.read()
            .rejected
            .iter()
            .map(|(id, r)| (id.clone(), r.error.clone()))
            .collect()
    }

    /// Number of accepted models.
    pub fn len(&self) -> usize {
        self.read().models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().models.is_empty()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Saves `next` and, only if that succeeds, makes it the live collection.
    fn commit(&self, live: &mut Collection, next: Collection) -> Result<(), StoreError> {
        let documents = next.to_documents();
        self.persistence.save(&documents)?;
        debug!(models = documents.len(), "committed model collection");
        *live = next;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Collection> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collection> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
