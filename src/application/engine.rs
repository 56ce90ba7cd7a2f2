use crate::domain::asset::{Address, Amount, Balance};
use crate::domain::escrow::{Caller, EscrowRecord, EscrowUpdate};
use crate::domain::ports::{AssetLedgerBox, ValueConverterBox};
use crate::error::{EscrowError, Result};

/// The main entry point of the escrow core.
///
/// `EscrowEngine` holds at most one un-completed escrow at a time. It owns the
/// append-only log of records, the observable event log and the last seen
/// block height; funds themselves live on the external ledger under the
/// engine's custody address. Sequential consistency comes from awaiting every
/// collaborator call before touching engine state.
pub struct EscrowEngine {
    /// Identity under which deposits are held on the ledger.
    custody: Address,
    /// The stable unit deposits are valued in at initiation.
    reference_asset: Address,
    ledger: AssetLedgerBox,
    converter: ValueConverterBox,
    /// Last block height reported by the host driver.
    height: u64,
    escrows: Vec<EscrowRecord>,
    /// Index of the single un-completed record, if any.
    active: Option<usize>,
    events: Vec<EscrowUpdate>,
}

impl EscrowEngine {
    pub fn new(
        custody: Address,
        reference_asset: Address,
        ledger: AssetLedgerBox,
        converter: ValueConverterBox,
    ) -> Self {
        Self {
            custody,
            reference_asset,
            ledger,
            converter,
            height: 0,
            escrows: Vec::new(),
            active: None,
            events: Vec::new(),
        }
    }

    /// Opens a new escrow for `deposit_amount` of `deposit_asset`, already in
    /// custody, to be paid out to `beneficiary` no later than `period_blocks`
    /// from now.
    ///
    /// Books the conversion rate (a quote, no funds move) and appends the
    /// record. Fails without state change when the beneficiary or asset is
    /// the zero address, the period is zero, custody does not cover the
    /// deposit, or an un-completed escrow already exists.
    pub async fn initiate(
        &mut self,
        caller: Address,
        beneficiary: Address,
        deposit_asset: Address,
        deposit_amount: Amount,
        period_blocks: u64,
    ) -> Result<u64> {
        if beneficiary.is_zero() {
            return Err(EscrowError::ZeroAddress("beneficiary"));
        }
        if deposit_asset.is_zero() {
            return Err(EscrowError::ZeroAddress("deposit asset"));
        }
        if period_blocks == 0 {
            return Err(EscrowError::InvalidPeriod);
        }
        let deadline = self
            .height
            .checked_add(period_blocks)
            .ok_or(EscrowError::InvalidPeriod)?;

        let deposit: Balance = deposit_amount.into();
        let held = self.ledger.balance_of(deposit_asset, self.custody).await?;
        if held < deposit {
            return Err(EscrowError::InsufficientCustody {
                held,
                requested: deposit,
            });
        }
        if self.active.is_some() {
            return Err(EscrowError::EscrowBusy);
        }

        let reference_value = self
            .converter
            .quote(&[deposit_asset, self.reference_asset], deposit)
            .await?;

        let id = self.escrows.len() as u64;
        self.escrows.push(EscrowRecord {
            id,
            initiator: caller,
            beneficiary,
            deposit_asset,
            deposit_amount: deposit,
            reference_value,
            payout_asset: None,
            deadline,
            completed: false,
        });
        self.active = Some(id as usize);
        self.events.push(EscrowUpdate {
            initiator: caller,
            beneficiary,
            reference_value,
            fulfilled: false,
        });
        tracing::info!(
            id,
            %caller,
            %beneficiary,
            reference_value = %reference_value,
            deadline,
            "escrow initiated"
        );
        Ok(id)
    }

    /// Redirects the pending payout into `asset`. Beneficiary only, and only
    /// while the escrow is un-completed; the reference value booked at
    /// initiation is untouched.
    pub fn set_payout_asset(&mut self, caller: Address, asset: Address) -> Result<()> {
        if asset.is_zero() {
            return Err(EscrowError::ZeroAddress("payout asset"));
        }
        let idx = self.active_index()?;
        let record = &mut self.escrows[idx];
        if caller != record.beneficiary {
            return Err(EscrowError::NotBeneficiary);
        }
        record.payout_asset = Some(asset);
        tracing::debug!(id = record.id, payout_asset = %asset, "payout asset set");
        Ok(())
    }

    /// Settles the active escrow: converts the held deposit into the
    /// reference asset and pays the beneficiary, either the booked reference
    /// value directly or its swap into the chosen payout asset.
    ///
    /// Permitted to the record's initiator and to the engine's own
    /// block-boundary trigger; anyone else gets `NotAuthorizedToSettle`.
    /// This is the only place funds leave custody.
    pub async fn settle(&mut self, caller: Caller) -> Result<()> {
        let idx = self.active_index()?;
        let record = &self.escrows[idx];
        if let Caller::External(addr) = caller
            && addr != record.initiator
        {
            return Err(EscrowError::NotAuthorizedToSettle);
        }

        let initiator = record.initiator;
        let beneficiary = record.beneficiary;
        let deposit_asset = record.deposit_asset;
        let deposit_amount = record.deposit_amount;
        let reference_value = record.reference_value;
        let payout_asset = record.payout_asset;

        // Pre-flight: prove both swap legs exist and that converting the
        // deposit leaves custody able to cover the booked payout. Nothing
        // may move until the whole settlement is known to go through.
        let expected_out = self
            .converter
            .quote(&[deposit_asset, self.reference_asset], deposit_amount)
            .await?;
        let custody_reference = self
            .ledger
            .balance_of(self.reference_asset, self.custody)
            .await?;
        let available = expected_out + custody_reference;
        if available < reference_value {
            return Err(EscrowError::InsufficientCustody {
                held: available,
                requested: reference_value,
            });
        }
        if let Some(egress) = payout_asset {
            self.converter
                .quote(&[self.reference_asset, egress], reference_value)
                .await?;
        }

        self.converter
            .swap_exact_in(
                self.custody,
                &[deposit_asset, self.reference_asset],
                deposit_amount,
                Balance::ZERO,
            )
            .await?;

        match payout_asset {
            Some(egress) => {
                let payout = self
                    .converter
                    .swap_exact_in(
                        self.custody,
                        &[self.reference_asset, egress],
                        reference_value,
                        Balance::ZERO,
                    )
                    .await?;
                self.ledger
                    .transfer(egress, self.custody, beneficiary, payout)
                    .await?;
            }
            None => {
                self.ledger
                    .transfer(self.reference_asset, self.custody, beneficiary, reference_value)
                    .await?;
            }
        }

        self.escrows[idx].completed = true;
        self.active = None;
        self.events.push(EscrowUpdate {
            initiator,
            beneficiary,
            reference_value,
            fulfilled: true,
        });
        tracing::info!(id = idx as u64, triggered = matches!(caller, Caller::SelfTriggered), "escrow settled");
        Ok(())
    }

    /// Block-boundary hook, called by the host driver once per new block.
    ///
    /// Settles the active escrow under the engine's own authority once its
    /// deadline is reached or passed. An idle engine or a not-yet-due escrow
    /// is a silent no-op; collaborator failures propagate and leave the
    /// record pending for a later block.
    pub async fn on_tick(&mut self, height: u64) -> Result<()> {
        if height > self.height {
            self.height = height;
        }
        let due = self
            .active
            .is_some_and(|idx| self.height >= self.escrows[idx].deadline);
        if due {
            self.settle(Caller::SelfTriggered).await?;
        }
        Ok(())
    }

    pub fn number_of_escrows(&self) -> u64 {
        self.escrows.len() as u64
    }

    pub fn escrow(&self, index: u64) -> Option<&EscrowRecord> {
        self.escrows.get(index as usize)
    }

    pub fn escrows(&self) -> &[EscrowRecord] {
        &self.escrows
    }

    pub fn events(&self) -> &[EscrowUpdate] {
        &self.events
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn custody(&self) -> Address {
        self.custody
    }

    pub fn reference_asset(&self) -> Address {
        self.reference_asset
    }

    /// Resolves the single active slot, distinguishing "latest record is
    /// finished" from "nothing was ever opened".
    fn active_index(&self) -> Result<usize> {
        match self.active {
            Some(idx) => Ok(idx),
            None if self.escrows.last().is_some_and(|r| r.completed) => {
                Err(EscrowError::AlreadyCompleted)
            }
            None => Err(EscrowError::NoActiveEscrow),
        }
    }
}
