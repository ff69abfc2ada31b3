//! Wizard controller: what "submit" means for the open stage.

use bloomframe_core::{DomainError, SubmitOutcome};
use bloomframe_orders::{
    AggregateCache, BouquetForm, CustomerSectionForm, OrderForm, PaperweightSectionForm,
    WizardSnapshot,
};
use bloomframe_store::DocumentStore;

use crate::error::{WorkflowError, WorkflowResult};
use crate::pipeline::{CreatedOrder, CreationPipeline, PipelineOutcome};
use crate::reconcile::ReconciliationEngine;
use crate::stage::{next_stage, StageForm, StageKind, WizardMode, WizardStage};

/// What a submission did.
#[derive(Debug)]
pub enum SubmitResult {
    /// Create mode: the section was recorded and the next stage opened.
    Advanced(WizardStage),
    /// Create mode: the terminal stage ran the pipeline; the wizard closed.
    Completed(Box<CreatedOrder>),
    /// Edit mode: the open section was synchronized; the wizard closed.
    SectionSynced,
    /// Validation rejected the submission; the wizard stays open.
    Rejected { message: String },
}

/// Section payloads accumulated while the create wizard walks its stages.
#[derive(Debug, Default)]
struct OrderDraft {
    customer: Option<CustomerSectionForm>,
    bouquets: Option<Vec<BouquetForm>>,
    paperweight: Option<PaperweightSectionForm>,
}

impl OrderDraft {
    fn assemble(&self) -> WorkflowResult<OrderForm> {
        Ok(OrderForm {
            customer: self
                .customer
                .clone()
                .ok_or(WorkflowError::MissingPrerequisite("customer section"))?,
            bouquets: self.bouquets.clone().unwrap_or_default(),
            paperweight: self.paperweight.unwrap_or_default(),
        })
    }
}

/// Drives one wizard session over an injected store handle and cache.
pub struct WizardController<'a> {
    store: &'a dyn DocumentStore,
    cache: &'a AggregateCache,
    mode: WizardMode,
    /// `None` once the wizard has closed.
    stage: Option<WizardStage>,
    draft: OrderDraft,
    snapshot: Option<WizardSnapshot>,
}

impl<'a> WizardController<'a> {
    /// Open a create-mode wizard at the initial stage.
    pub fn create(store: &'a dyn DocumentStore, cache: &'a AggregateCache) -> Self {
        Self {
            store,
            cache,
            mode: WizardMode::Create,
            stage: Some(WizardStage::INITIAL),
            draft: OrderDraft::default(),
            snapshot: None,
        }
    }

    /// Open an edit-mode wizard directly at the stage the user selected,
    /// seeded with the snapshot the normalizer rebuilt from the aggregate.
    pub fn edit(
        store: &'a dyn DocumentStore,
        cache: &'a AggregateCache,
        stage: WizardStage,
        snapshot: WizardSnapshot,
    ) -> WorkflowResult<Self> {
        if stage.is_terminal() {
            return Err(DomainError::validation("the review stage cannot be edited").into());
        }
        Ok(Self {
            store,
            cache,
            mode: WizardMode::Edit,
            stage: Some(stage),
            draft: OrderDraft::default(),
            snapshot: Some(snapshot),
        })
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn open_stage(&self) -> Option<WizardStage> {
        self.stage
    }

    pub fn is_open(&self) -> bool {
        self.stage.is_some()
    }

    /// Submit the open stage's values.
    ///
    /// Create mode: records the section and advances, or runs the creation
    /// pipeline at the terminal stage. Edit mode: synchronizes the open
    /// section only. Validation rejections leave the wizard open; successful
    /// terminal/edit submissions invalidate cached reads and close it.
    pub async fn submit(&mut self, form: StageForm) -> WorkflowResult<SubmitResult> {
        let open = self.stage.ok_or(WorkflowError::WizardClosed)?;
        if open.expected_kind() != form.kind() {
            return Err(WorkflowError::StageMismatch {
                open,
                submitted: form.kind().name(),
            });
        }

        match self.mode {
            WizardMode::Create => self.submit_create(open, form).await,
            WizardMode::Edit => self.submit_edit(form).await,
        }
    }

    async fn submit_create(
        &mut self,
        open: WizardStage,
        form: StageForm,
    ) -> WorkflowResult<SubmitResult> {
        match form {
            StageForm::Customer(section) => {
                if let Some(message) = validate_customer_section(&section) {
                    return Ok(SubmitResult::Rejected { message });
                }
                self.draft.customer = Some(section);
                self.advance(open, StageKind::Customer)
            }
            StageForm::Bouquets(rows) => {
                self.draft.bouquets = Some(rows);
                self.advance(open, StageKind::Bouquets)
            }
            StageForm::Paperweight(section) => {
                if section.is_partial() {
                    return Ok(SubmitResult::Rejected {
                        message: "Please provide both paperweight quantity and price.".into(),
                    });
                }
                self.draft.paperweight = Some(section);
                self.advance(open, StageKind::Paperweight)
            }
            StageForm::Review => {
                let form = self.draft.assemble()?;
                let pipeline = CreationPipeline::new(self.store);
                match pipeline.create(&form).await? {
                    PipelineOutcome::Created(created) => {
                        // A new order shifts the whole list view.
                        self.cache.clear();
                        self.stage = None;
                        Ok(SubmitResult::Completed(created))
                    }
                    PipelineOutcome::Rejected { message } => {
                        Ok(SubmitResult::Rejected { message })
                    }
                }
            }
        }
    }

    async fn submit_edit(&mut self, form: StageForm) -> WorkflowResult<SubmitResult> {
        let snapshot = self
            .snapshot
            .as_ref()
            .ok_or(WorkflowError::MissingPrerequisite("edit snapshot"))?;
        let engine = ReconciliationEngine::new(self.store);

        let outcome = match &form {
            StageForm::Customer(section) => {
                engine.sync_customer_section(snapshot, section).await?
            }
            StageForm::Bouquets(rows) => engine.sync_bouquet_section(snapshot, rows).await?,
            StageForm::Paperweight(section) => {
                engine.sync_paperweight_section(snapshot, section).await?
            }
            // `edit()` refuses to open the review stage.
            StageForm::Review => {
                return Err(DomainError::validation("the review stage cannot be edited").into())
            }
        };

        match outcome {
            SubmitOutcome::Accepted => {
                if let Some(order_id) = snapshot.order_id {
                    self.cache.invalidate(order_id);
                }
                self.stage = None;
                Ok(SubmitResult::SectionSynced)
            }
            SubmitOutcome::Rejected { message } => Ok(SubmitResult::Rejected { message }),
        }
    }

    fn advance(&mut self, open: WizardStage, kind: StageKind) -> WorkflowResult<SubmitResult> {
        let next = next_stage(open, kind).ok_or(WorkflowError::StageMismatch {
            open,
            submitted: kind.name(),
        })?;
        self.stage = Some(next);
        Ok(SubmitResult::Advanced(next))
    }
}

fn validate_customer_section(section: &CustomerSectionForm) -> Option<String> {
    if section.first_name.trim().is_empty() || section.surname.trim().is_empty() {
        return Some("Please provide the customer's name.".into());
    }
    if section.email.trim().is_empty() {
        return Some("Please provide an email address.".into());
    }
    if !section.delivery_same_as_billing && section.delivery.is_none() {
        return Some("Please provide a delivery address.".into());
    }
    None
}
