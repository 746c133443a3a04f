//! Allocate-and-create orchestration with optimistic retry.

use super::policy::AllocationPolicy;
use super::sequence::{find_category, plan_allocation, Allocation, SequencedCategory};
use super::store::AssetStore;
use super::AllocationError;
use crate::types::DbId;

/// Creates assets with freshly allocated identifiers.
///
/// The allocator holds no state between calls besides its store handle:
/// every attempt re-reads the taken identifiers, so a retry after a lost race
/// sees the winner's row and moves on to the next free slot.
pub struct AssetIdAllocator<S> {
    store: S,
    policy: AllocationPolicy,
}

impl<S: AssetStore> AssetIdAllocator<S> {
    pub fn new(store: S, policy: AllocationPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compute the identifier and watermark the next asset in `category_id`
    /// would receive. Reads the store; writes nothing.
    pub async fn compute_next_identifier<C>(
        &self,
        category_id: DbId,
        categories: &[C],
    ) -> Result<Allocation, AllocationError>
    where
        C: SequencedCategory + Sync,
    {
        let category = find_category(categories, category_id)?;
        self.plan_for(category).await
    }

    /// Just the identifier from [`Self::compute_next_identifier`].
    pub async fn preview_next_identifier<C>(
        &self,
        category_id: DbId,
        categories: &[C],
    ) -> Result<String, AllocationError>
    where
        C: SequencedCategory + Sync,
    {
        Ok(self
            .compute_next_identifier(category_id, categories)
            .await?
            .asset_id)
    }

    /// Allocate an identifier in `category_id` and create the asset with it.
    ///
    /// A unique violation on `asset_id` restarts the whole sequence after a
    /// jittered pause, up to the policy's attempt budget. Any other store
    /// failure is returned immediately. Once the asset exists, the category
    /// watermark is advanced on a best-effort basis.
    pub async fn create_asset_with_allocated_id<C>(
        &self,
        category_id: DbId,
        draft: &S::Draft,
        categories: &[C],
    ) -> Result<S::Asset, AllocationError>
    where
        C: SequencedCategory + Sync,
    {
        let category = find_category(categories, category_id)?;
        let max_attempts = self.policy.attempts();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let allocation = self.plan_for(category).await?;

            match self
                .store
                .create_asset(draft, category.id(), &allocation.asset_id)
                .await
            {
                Ok(asset) => {
                    tracing::info!(
                        category_id = category.id(),
                        asset_id = %allocation.asset_id,
                        attempt,
                        "Asset created with allocated identifier",
                    );
                    self.advance_watermark(category, &allocation).await;
                    return Ok(asset);
                }
                Err(err) if err.is_asset_id_conflict() => {
                    if attempt >= max_attempts {
                        tracing::error!(
                            category_id = category.id(),
                            asset_id = %allocation.asset_id,
                            attempts = attempt,
                            "Asset identifier allocation exhausted",
                        );
                        return Err(AllocationError::Exhausted {
                            attempts: attempt,
                            source: err,
                        });
                    }

                    let pause = self.policy.jittered_backoff();
                    tracing::warn!(
                        category_id = category.id(),
                        asset_id = %allocation.asset_id,
                        attempt,
                        max_attempts,
                        backoff_ms = pause.as_millis() as u64,
                        "Asset identifier taken concurrently, retrying",
                    );
                    if !pause.is_zero() {
                        tokio::time::sleep(pause).await;
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn plan_for<C>(&self, category: &C) -> Result<Allocation, AllocationError>
    where
        C: SequencedCategory + Sync,
    {
        let existing = self.store.list_category_asset_ids(category.id()).await?;
        plan_allocation(category, &existing)
    }

    /// Persist the watermark when it moved past the caller's snapshot.
    /// Failures are logged and dropped: the asset already exists.
    async fn advance_watermark<C>(&self, category: &C, allocation: &Allocation)
    where
        C: SequencedCategory + Sync,
    {
        if allocation.next_sequence <= category.next_sequence() {
            return;
        }

        if let Err(err) = self
            .store
            .advance_category_sequence(category.id(), allocation.next_sequence)
            .await
        {
            tracing::warn!(
                category_id = category.id(),
                next_sequence = allocation.next_sequence,
                error = %err,
                "Failed to advance category sequence (asset was created)",
            );
        }
    }
}
