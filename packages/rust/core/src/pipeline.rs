//! Per-kind pipeline: scope → fetch → filter → enrich → normalize.
//!
//! Films are scoped by their own episode number and sorted by it. Every
//! other kind is scoped by the references of the in-saga films and keeps
//! upstream catalog order. A failed catalog fetch aborts the run with an
//! empty result. Enrichment never fails a run.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use holocron_shared::{EntityKind, PipelineConfig, Result};
use holocron_wiki::WikiClient;

use crate::catalog::CatalogClient;
use crate::documents::{
    CharacterDocument, DocIds, FilmDocument, PlanetDocument, ReferencedEntity, SpeciesDocument,
    StarshipDocument, VehicleDocument,
};
use crate::profile::KindProfile;
use crate::records::{PersonRecord, PlanetRecord, SpeciesRecord, StarshipRecord, VehicleRecord};
use crate::reference::resolve_reference;
use crate::scope::{FilmReference, ScopeSet, in_saga, scope_ids};
use crate::slug::slug_for;

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before an entity is enriched.
    fn entity_started(&self, name: &str, current: usize, total: usize);
    /// Called when a kind's run completes.
    fn done(&self, kind: EntityKind, count: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn entity_started(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _kind: EntityKind, _count: usize) {}
}

/// Runs the per-kind pipelines against one catalog and one wiki.
pub struct Pipeline {
    catalog: CatalogClient,
    wiki: WikiClient,
    config: PipelineConfig,
    progress: Box<dyn ProgressReporter>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let catalog = CatalogClient::new(&config.swapi_base_url)?;
        let wiki = WikiClient::new(
            &config.wiki_base_url,
            &config.user_agent,
            config.timeout_secs.map(Duration::from_secs),
        )?;

        Ok(Self {
            catalog,
            wiki,
            config,
            progress: Box::new(SilentProgress),
        })
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Effective profile for `kind`, with configured overrides applied.
    pub fn profile(&self, kind: EntityKind) -> KindProfile {
        KindProfile::resolve(kind, &self.config.overrides_for(kind))
    }

    /// Run the pipeline for `kind` and serialize its documents.
    pub async fn documents(&self, kind: EntityKind) -> Result<Vec<Value>> {
        match kind {
            EntityKind::Films => to_values(self.films().await),
            EntityKind::Characters => to_values(self.characters().await),
            EntityKind::Planets => to_values(self.planets().await),
            EntityKind::Species => to_values(self.species().await),
            EntityKind::Starships => to_values(self.starships().await),
            EntityKind::Vehicles => to_values(self.vehicles().await),
        }
    }

    /// Saga films in episode order.
    #[instrument(skip_all, fields(kind = %EntityKind::Films))]
    pub async fn films(&self) -> Vec<FilmDocument> {
        let profile = self.profile(EntityKind::Films);

        self.progress.phase("Fetching film catalog");
        let films = match self.catalog.fetch_films().await {
            Ok(films) => films,
            Err(e) => {
                warn!(error = %e, "film catalog unavailable, aborting");
                return Vec::new();
            }
        };

        let mut films: Vec<_> = films.into_iter().filter(|f| in_saga(f.episode_id)).collect();
        films.sort_by_key(|f| f.episode_id);
        info!(count = films.len(), "films in scope");

        self.progress.phase("Enriching films");
        let total = films.len();
        let mut documents = Vec::with_capacity(total);
        for (i, film) in films.into_iter().enumerate() {
            self.progress.entity_started(&film.title, i + 1, total);
            let wiki_plot = self.enrich(&profile, &film.title).await;
            let id = profile.document_id(&film.episode_id.to_string());
            documents.push(film.normalize(id, wiki_plot));
        }

        self.progress.done(EntityKind::Films, documents.len());
        info!(count = documents.len(), "films pipeline finished");
        documents
    }

    pub async fn characters(&self) -> Vec<CharacterDocument> {
        self.referenced::<PersonRecord>().await
    }

    pub async fn planets(&self) -> Vec<PlanetDocument> {
        self.referenced::<PlanetRecord>().await
    }

    pub async fn species(&self) -> Vec<SpeciesDocument> {
        self.referenced::<SpeciesRecord>().await
    }

    pub async fn starships(&self) -> Vec<StarshipDocument> {
        self.referenced::<StarshipRecord>().await
    }

    pub async fn vehicles(&self) -> Vec<VehicleDocument> {
        self.referenced::<VehicleRecord>().await
    }

    /// Ids of `field` referenced by saga films. Empty when the film catalog
    /// cannot be fetched.
    async fn scope(&self, field: FilmReference) -> ScopeSet {
        match self.catalog.fetch_films().await {
            Ok(films) => scope_ids(&films, field),
            Err(e) => {
                warn!(error = %e, "film catalog unavailable");
                ScopeSet::new()
            }
        }
    }

    #[instrument(skip_all, fields(kind = %E::KIND))]
    async fn referenced<E: ReferencedEntity>(&self) -> Vec<E::Document> {
        let profile = self.profile(E::KIND);
        let Some(field) = profile.film_reference else {
            warn!("kind is not scoped by film references");
            return Vec::new();
        };

        self.progress.phase("Computing saga scope");
        let scope = self.scope(field).await;
        if scope.is_empty() {
            info!("empty scope, aborting");
            return Vec::new();
        }
        debug!(count = scope.len(), "ids in scope");

        self.progress.phase("Fetching catalog");
        let records: Vec<E> = match self.catalog.fetch(profile.resource).await {
            Ok(records) => records,
            Err(e) => {
                warn!(resource = profile.resource, error = %e, "catalog unavailable, aborting");
                return Vec::new();
            }
        };

        let selected: Vec<(String, E)> = records
            .into_iter()
            .filter_map(|record| match resolve_reference(record.url()) {
                Some(id) if scope.contains(&id) => Some((id, record)),
                Some(_) => None,
                None => {
                    warn!(
                        entity = record.name(),
                        url = record.url(),
                        "skipping record with unresolvable url"
                    );
                    None
                }
            })
            .collect();
        info!(count = selected.len(), "records in scope");

        self.progress.phase("Enriching");
        let total = selected.len();
        let mut documents = Vec::with_capacity(total);
        for (i, (upstream_id, record)) in selected.into_iter().enumerate() {
            self.progress.entity_started(record.name(), i + 1, total);
            let wiki_text = self.enrich(&profile, record.name()).await;
            let ids = DocIds {
                id: profile.document_id(&upstream_id),
                original_swapi_id: upstream_id,
            };
            documents.push(record.normalize(ids, wiki_text));
        }

        self.progress.done(E::KIND, documents.len());
        info!(count = documents.len(), "pipeline finished");
        documents
    }

    /// Wiki text for one entity, followed by the kind's rate-limit pause.
    async fn enrich(&self, profile: &KindProfile, name: &str) -> String {
        let slug = slug_for(profile.kind, name);
        let text = self.wiki.describe(&slug, &profile.enrich_policy()).await;
        debug!(entity = name, slug = %slug, found = text.is_article(), "enriched");

        if !profile.delay.is_zero() {
            tokio::time::sleep(profile.delay).await;
        }
        text.into_string()
    }
}

fn to_values<T: Serialize>(documents: Vec<T>) -> Result<Vec<Value>> {
    let values = documents
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(values)
}
