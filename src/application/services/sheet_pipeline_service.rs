//! Sheet pipeline service - turns a character definition into a character sheet
//!
//! A run executes the seven stages strictly in order: abilities, combat
//! stats, skills, features, languages, proficiencies, attacks. Every stage
//! reads the definition and the outputs of earlier stages only. The sheet is
//! assembled once all stages succeeded and then written to the sheet store
//! in a single `set`; a failed or cancelled run never touches the store.
//!
//! Each character has at most one active run. Regenerating cancels the
//! active run before starting a fresh one, while `get_character_sheet` joins
//! the active run instead of starting a second one. Both decisions are made
//! while holding the character's slot lock, and the store write at the end
//! of a run happens under that same lock after checking that the run is
//! still the character's current run.
//!
//! A panic inside the stages or the store write fails the run like any
//! other error, so nobody waits on a run that can no longer finish. Slots
//! are only created for characters whose definition loaded.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::application::ports::inbound::{
    CharacterSheetUseCase, PipelineError, PipelineStats, RunOutcome, RunState, SheetLookup,
};
use crate::application::ports::outbound::{
    CharacterDefinitionRepositoryPort, CharacterSheetStorePort, LlmPort, RepositoryError,
};
use crate::application::services::FeaturesGenerator;
use crate::domain::entities::{
    CharacterDefinition, CharacterSheet, CoreSelections, PipelineRun, PipelineStage, SheetHeader,
    SheetSections,
};
use crate::domain::rules::{RuleTables, RulesError};
use crate::domain::services::{
    AbilityScoreCalculator, AttacksGenerator, CombatStatsCalculator, LanguagesGenerator,
    ProficienciesGenerator, SkillsGenerator,
};
use crate::domain::value_objects::{AppSettings, CharacterId, RunId};

/// The run a character slot currently points at
struct ActiveRun {
    run_id: RunId,
    state: Arc<watch::Sender<RunState>>,
    task: JoinHandle<()>,
}

impl ActiveRun {
    fn is_running(&self) -> bool {
        self.state.borrow().outcome.is_none()
    }
}

#[derive(Default)]
struct CharacterSlot {
    current: Option<ActiveRun>,
}

type SlotHandle = Arc<Mutex<CharacterSlot>>;

#[derive(Default)]
struct Counters {
    runs_started: AtomicU64,
    runs_succeeded: AtomicU64,
    runs_failed: AtomicU64,
    runs_cancelled: AtomicU64,
    stages_executed: AtomicU64,
}

#[derive(Clone)]
pub struct SheetPipelineService {
    definitions: Arc<dyn CharacterDefinitionRepositoryPort>,
    store: Arc<dyn CharacterSheetStorePort>,
    tables: Arc<RuleTables>,
    features: Arc<FeaturesGenerator>,
    settings: AppSettings,
    slots: Arc<Mutex<HashMap<CharacterId, SlotHandle>>>,
    counters: Arc<Counters>,
}

impl SheetPipelineService {
    pub fn new(
        definitions: Arc<dyn CharacterDefinitionRepositoryPort>,
        store: Arc<dyn CharacterSheetStorePort>,
        tables: Arc<RuleTables>,
        llm: Arc<dyn LlmPort>,
        settings: AppSettings,
    ) -> Self {
        Self {
            definitions,
            store,
            tables,
            features: Arc::new(FeaturesGenerator::new(llm, settings.clone())),
            settings,
            slots: Arc::new(Mutex::new(HashMap::new())),
            counters: Arc::new(Counters::default()),
        }
    }

    async fn slot(&self, id: CharacterId) -> SlotHandle {
        let mut slots = self.slots.lock().await;
        slots.entry(id).or_default().clone()
    }

    async fn existing_slot(&self, id: CharacterId) -> Option<SlotHandle> {
        self.slots.lock().await.get(&id).cloned()
    }

    /// Load the definition and check the fields every stage needs
    async fn load_definition(&self, id: CharacterId) -> Result<CharacterDefinition, PipelineError> {
        let definition = self
            .definitions
            .get(id)
            .await
            .map_err(repository_error)?
            .ok_or(PipelineError::NotFound(id))?;

        if let Err(field) = definition.core_selections() {
            warn!("Rejected sheet generation for {}: missing or invalid {}", id, field);
            return Err(PipelineError::Validation {
                character_id: id,
                field,
            });
        }
        Ok(definition)
    }

    /// Start a run and point the slot at it. Called with the slot locked.
    fn start_run(
        &self,
        handle: &SlotHandle,
        slot: &mut CharacterSlot,
        definition: CharacterDefinition,
    ) -> watch::Receiver<RunState> {
        let run = PipelineRun::new(definition.id);
        let run_id = run.id;
        let (state, receiver) = watch::channel(RunState::new(run));
        let state = Arc::new(state);

        self.counters.runs_started.fetch_add(1, Ordering::Relaxed);
        info!("Starting sheet run {} for character {}", run_id, definition.id);

        let service = self.clone();
        let task_state = state.clone();
        let task_slot = handle.clone();
        let task = tokio::spawn(async move {
            service.execute(run_id, definition, task_state, task_slot).await;
        });

        slot.current = Some(ActiveRun {
            run_id,
            state,
            task,
        });
        receiver
    }

    /// Cancel a run: mark it Cancelled and abort its task. Called with the
    /// slot locked.
    fn cancel(&self, active: &ActiveRun) {
        let cancelled = active.state.send_if_modified(|state| {
            if state.run.cancel().is_ok() {
                state.outcome = Some(Err(PipelineError::Cancelled));
                true
            } else {
                false
            }
        });
        active.task.abort();

        if cancelled {
            self.counters.runs_cancelled.fetch_add(1, Ordering::Relaxed);
            info!("Cancelled sheet run {}", active.run_id);
        }
    }

    async fn execute(
        self,
        run_id: RunId,
        definition: CharacterDefinition,
        state: Arc<watch::Sender<RunState>>,
        handle: SlotHandle,
    ) {
        let id = definition.id;
        let computed = match AssertUnwindSafe(self.run_stages(&definition, &state))
            .catch_unwind()
            .await
        {
            Ok(computed) => computed,
            Err(_) => {
                let stage = state.borrow().run.stage;
                error!("Sheet run {} panicked during {}", run_id, stage.label());
                Err(PipelineError::StagePanicked { stage })
            }
        };

        let slot = handle.lock().await;
        let is_current = slot
            .current
            .as_ref()
            .is_some_and(|active| active.run_id == run_id);
        if !is_current {
            debug!("Sheet run {} was superseded, discarding its result", run_id);
            return;
        }

        let outcome = match computed {
            Ok(sheet) => match AssertUnwindSafe(self.store.set(id, &sheet)).catch_unwind().await {
                Ok(Ok(())) => Ok(Arc::new(sheet)),
                Ok(Err(e)) => Err(repository_error(e)),
                Err(_) => Err(PipelineError::Repository(
                    "sheet store panicked during write".to_string(),
                )),
            },
            Err(e) => Err(e),
        };

        match outcome {
            Ok(sheet) => {
                state.send_if_modified(|state| {
                    if state.run.advance(PipelineStage::Complete).is_ok() {
                        state.outcome = Some(Ok(sheet));
                        true
                    } else {
                        false
                    }
                });
                self.counters.runs_succeeded.fetch_add(1, Ordering::Relaxed);
                info!("Sheet run {} for character {} complete", run_id, id);
            }
            // Only produced once the run has already been marked Cancelled
            Err(PipelineError::Cancelled) => {}
            Err(e) => {
                let message = e.to_string();
                state.send_if_modified(|state| {
                    if state.run.fail(message.as_str()).is_ok() {
                        state.outcome = Some(Err(e));
                        true
                    } else {
                        false
                    }
                });
                self.counters.runs_failed.fetch_add(1, Ordering::Relaxed);
                error!("Sheet run {} for character {} failed: {}", run_id, id, message);
            }
        }
        drop(slot);
    }

    async fn run_stages(
        &self,
        definition: &CharacterDefinition,
        state: &watch::Sender<RunState>,
    ) -> Result<CharacterSheet, PipelineError> {
        let core = definition
            .core_selections()
            .map_err(|field| PipelineError::Validation {
                character_id: definition.id,
                field,
            })?;
        let tables = self.tables.as_ref();

        self.enter(state, PipelineStage::CalculatingAbilities)?;
        let abilities = AbilityScoreCalculator::new(tables, self.settings.ability_bounds())
            .calculate(definition, &core)
            .map_err(failed_at(PipelineStage::CalculatingAbilities))?;

        self.enter(state, PipelineStage::CalculatingBaseStats)?;
        let base_combat = CombatStatsCalculator::new(tables)
            .calculate(definition, &core, &abilities)
            .map_err(failed_at(PipelineStage::CalculatingBaseStats))?;

        self.enter(state, PipelineStage::GeneratingSkills)?;
        let skills = SkillsGenerator::new(tables)
            .generate(definition, &core, &abilities)
            .map_err(failed_at(PipelineStage::GeneratingSkills))?;

        self.enter(state, PipelineStage::GeneratingFeatures)?;
        let features = self
            .features
            .generate(tables, definition, &core)
            .await
            .map_err(failed_at(PipelineStage::GeneratingFeatures))?;

        self.enter(state, PipelineStage::GeneratingLanguages)?;
        let languages = LanguagesGenerator::new(tables)
            .generate(definition, &core)
            .map_err(failed_at(PipelineStage::GeneratingLanguages))?;

        self.enter(state, PipelineStage::GeneratingProficiencies)?;
        let proficiencies = ProficienciesGenerator::new(tables)
            .generate(&core)
            .map_err(failed_at(PipelineStage::GeneratingProficiencies))?;

        self.enter(state, PipelineStage::GeneratingAttacks)?;
        let attacks = AttacksGenerator::new(tables)
            .generate(definition, &abilities, &skills, &proficiencies)
            .map_err(failed_at(PipelineStage::GeneratingAttacks))?;

        let header = sheet_header(tables, &core).map_err(failed_at(PipelineStage::GeneratingAttacks))?;
        let sections = SheetSections {
            abilities,
            base_combat,
            skills,
            features,
            languages,
            proficiencies,
            attacks,
        };
        Ok(CharacterSheet::assemble(definition, header, sections))
    }

    /// Publish the next stage. Fails with `Cancelled` if the run was
    /// cancelled in the meantime.
    fn enter(&self, state: &watch::Sender<RunState>, stage: PipelineStage) -> Result<(), PipelineError> {
        let advanced = state.send_if_modified(|state| state.run.advance(stage).is_ok());
        if !advanced {
            return Err(PipelineError::Cancelled);
        }
        self.counters.stages_executed.fetch_add(1, Ordering::Relaxed);
        debug!("{}", stage.label());
        Ok(())
    }

    /// The running run of a character, if any
    async fn running(&self, id: CharacterId) -> Option<watch::Receiver<RunState>> {
        let handle = self.existing_slot(id).await?;
        let slot = handle.lock().await;
        slot.current
            .as_ref()
            .filter(|active| active.is_running())
            .map(|active| active.state.subscribe())
    }

    /// The current run of a character, finished or not
    async fn current(&self, id: CharacterId) -> Option<(RunId, watch::Receiver<RunState>)> {
        let handle = self.existing_slot(id).await?;
        let slot = handle.lock().await;
        slot.current
            .as_ref()
            .map(|active| (active.run_id, active.state.subscribe()))
    }

    /// Wait for a run to finish. A waiter whose run was cancelled follows
    /// the run that replaced it.
    async fn await_outcome(&self, id: CharacterId, mut receiver: watch::Receiver<RunState>) -> RunOutcome {
        loop {
            let waited_on = receiver.borrow().run.id;
            let outcome = match receiver.wait_for(|state| state.outcome.is_some()).await {
                Ok(state) => state.outcome.clone(),
                Err(_) => None,
            };

            match outcome.unwrap_or(Err(PipelineError::Cancelled)) {
                Err(PipelineError::Cancelled) => match self.current(id).await {
                    Some((run_id, next)) if run_id != waited_on => {
                        debug!("Run {} was replaced by {}, following", waited_on, run_id);
                        receiver = next;
                    }
                    _ => return Err(PipelineError::Cancelled),
                },
                other => return other,
            }
        }
    }
}

#[async_trait]
impl CharacterSheetUseCase for SheetPipelineService {
    #[instrument(skip(self))]
    async fn generate_character_sheet(&self, id: CharacterId) -> RunOutcome {
        // An invalid definition leaves any in-flight run alone
        let definition = self.load_definition(id).await?;

        let handle = self.slot(id).await;
        let receiver = {
            let mut slot = handle.lock().await;
            if let Some(active) = slot.current.as_ref().filter(|active| active.is_running()) {
                self.cancel(active);
            }
            self.start_run(&handle, &mut slot, definition)
        };

        self.await_outcome(id, receiver).await
    }

    #[instrument(skip(self))]
    async fn get_character_sheet(&self, id: CharacterId) -> RunOutcome {
        if let Some(receiver) = self.running(id).await {
            return self.await_outcome(id, receiver).await;
        }
        if let Some(sheet) = self.store.get(id).await.map_err(repository_error)? {
            return Ok(Arc::new(sheet));
        }
        let definition = self.load_definition(id).await?;

        let handle = self.slot(id).await;
        let receiver = {
            let mut slot = handle.lock().await;
            match slot.current.as_ref().filter(|active| active.is_running()) {
                Some(active) => {
                    debug!("Joining sheet run {}", active.run_id);
                    active.state.subscribe()
                }
                None => {
                    // Another caller's run may have committed since the first look
                    if let Some(sheet) = self.store.get(id).await.map_err(repository_error)? {
                        return Ok(Arc::new(sheet));
                    }
                    self.start_run(&handle, &mut slot, definition)
                }
            }
        };

        self.await_outcome(id, receiver).await
    }

    async fn peek_character_sheet(&self, id: CharacterId) -> Result<SheetLookup, PipelineError> {
        if let Some((_, receiver)) = self.current(id).await {
            let state = receiver.borrow().clone();
            if state.outcome.is_none() {
                return Ok(SheetLookup::Pending(state.run));
            }
        }

        match self.store.get(id).await.map_err(repository_error)? {
            Some(sheet) => Ok(SheetLookup::Ready(Arc::new(sheet))),
            None => Ok(SheetLookup::NotFound),
        }
    }

    async fn progress(&self, id: CharacterId) -> Option<PipelineRun> {
        let handle = self.existing_slot(id).await?;
        let slot = handle.lock().await;
        slot.current
            .as_ref()
            .map(|active| active.state.borrow().run.clone())
    }

    async fn subscribe(&self, id: CharacterId) -> Option<watch::Receiver<RunState>> {
        self.current(id).await.map(|(_, receiver)| receiver)
    }

    fn stats(&self) -> PipelineStats {
        PipelineStats {
            runs_started: self.counters.runs_started.load(Ordering::Relaxed),
            runs_succeeded: self.counters.runs_succeeded.load(Ordering::Relaxed),
            runs_failed: self.counters.runs_failed.load(Ordering::Relaxed),
            runs_cancelled: self.counters.runs_cancelled.load(Ordering::Relaxed),
            stages_executed: self.counters.stages_executed.load(Ordering::Relaxed),
        }
    }
}

fn failed_at(stage: PipelineStage) -> impl FnOnce(RulesError) -> PipelineError {
    move |source| PipelineError::StageComputation { stage, source }
}

fn repository_error(e: RepositoryError) -> PipelineError {
    PipelineError::Repository(e.to_string())
}

fn sheet_header(tables: &RuleTables, core: &CoreSelections<'_>) -> Result<SheetHeader, RulesError> {
    Ok(SheetHeader {
        race: tables.race(core.race_id)?.name.clone(),
        class: tables.class(core.class_id)?.name.clone(),
        background: tables.background(core.background_id)?.name.clone(),
        rules_version: tables.version.clone(),
    })
}
