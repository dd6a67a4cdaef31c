use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Asset id of the network's native coin.
pub const NATIVE_ASSET_ID: &str = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub id: String,
    pub amount: u64,
    pub valid_height: u64,
}

impl Utxo {
    pub fn is_mature(&self, current_height: u64) -> bool {
        self.valid_height <= current_height
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SpendAccountUnspentOutput {
        output_id: String,
    },
    ControlAddress {
        amount: u64,
        asset_id: String,
        address: String,
    },
}

/// Spend actions for every merged output followed by the single consolidating output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionDraft {
    spends: Vec<Action>,
    output: Action,
}

impl TransactionDraft {
    pub fn consolidate(utxos: &[Utxo], address: &str, asset_id: &str) -> Option<Self> {
        let mut amount: u64 = 0;
        let mut spends = Vec::with_capacity(utxos.len());
        for utxo in utxos {
            spends.push(Action::SpendAccountUnspentOutput {
                output_id: utxo.id.clone(),
            });
            amount = amount.checked_add(utxo.amount)?;
        }

        Some(Self {
            spends,
            output: Action::ControlAddress {
                amount,
                asset_id: asset_id.to_string(),
                address: address.to_string(),
            },
        })
    }

    pub fn output_amount(&self) -> u64 {
        match &self.output {
            Action::ControlAddress { amount, .. } => *amount,
            Action::SpendAccountUnspentOutput { .. } => 0,
        }
    }

    /// Reduces the consolidating output by `fee`. Returns `false` and leaves the draft
    /// untouched when the output would drop to zero or below.
    pub fn deduct_fee(&mut self, fee: u64) -> bool {
        match &mut self.output {
            Action::ControlAddress { amount, .. } if *amount > fee => {
                *amount -= fee;
                true
            }
            _ => false,
        }
    }

    pub fn spends(&self) -> &[Action] {
        &self.spends
    }

    pub fn actions(&self) -> Vec<Action> {
        let mut actions = self.spends.clone();
        actions.push(self.output.clone());
        actions
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BuildRequest {
    pub base_transaction: Option<Value>,
    pub actions: Vec<Action>,
    pub ttl: u64,
}

impl BuildRequest {
    pub fn new(draft: &TransactionDraft, ttl: u64) -> Self {
        Self {
            base_transaction: None,
            actions: draft.actions(),
            ttl,
        }
    }
}

/// Unsigned template returned by the node; its contents are only meaningful to the node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionTemplate(pub Value);

#[derive(Clone, Debug, Deserialize)]
pub struct SignedTransaction {
    pub sign_complete: bool,
    /// Nodes may leave this out when signing did not complete.
    #[serde(default)]
    pub transaction: Option<SignedTemplate>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SignedTemplate {
    #[serde(default)]
    pub raw_transaction: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::actions::{Action, BuildRequest, TransactionDraft, Utxo, NATIVE_ASSET_ID};
    use serde_json::json;

    fn utxo(id: &str, amount: u64) -> Utxo {
        Utxo {
            id: id.to_string(),
            amount,
            valid_height: 0,
        }
    }

    #[test]
    fn actions_serialize_with_type_tag() {
        let draft = TransactionDraft::consolidate(
            &[utxo("a", 500_000_000), utxo("b", 300_000_000)],
            "bm1qdest",
            NATIVE_ASSET_ID,
        )
        .unwrap();
        let request = serde_json::to_value(BuildRequest::new(&draft, 1)).unwrap();
        assert_eq!(
            request,
            json!({
                "base_transaction": null,
                "actions": [
                    {"type": "spend_account_unspent_output", "output_id": "a"},
                    {"type": "spend_account_unspent_output", "output_id": "b"},
                    {
                        "type": "control_address",
                        "amount": 800_000_000u64,
                        "asset_id": NATIVE_ASSET_ID,
                        "address": "bm1qdest"
                    }
                ],
                "ttl": 1
            })
        );
    }

    #[test]
    fn fee_touches_only_the_output() {
        let mut draft = TransactionDraft::consolidate(
            &[utxo("a", 500_000_000), utxo("b", 300_000_000)],
            "bm1qdest",
            NATIVE_ASSET_ID,
        )
        .unwrap();
        let spends = draft.spends().to_vec();
        assert!(draft.deduct_fee(10_000));
        assert_eq!(draft.output_amount(), 799_990_000);
        assert_eq!(draft.spends(), spends.as_slice());
    }

    #[test]
    fn fee_cannot_empty_the_output() {
        let mut draft =
            TransactionDraft::consolidate(&[utxo("a", 600), utxo("b", 400)], "x", NATIVE_ASSET_ID)
                .unwrap();
        assert!(!draft.deduct_fee(1_000));
        assert!(!draft.deduct_fee(5_000));
        assert_eq!(draft.output_amount(), 1_000);
    }

    #[test]
    fn overflowing_sum_is_rejected() {
        assert!(TransactionDraft::consolidate(
            &[utxo("a", u64::MAX), utxo("b", 1)],
            "x",
            NATIVE_ASSET_ID
        )
        .is_none());
    }

    #[test]
    fn utxo_ignores_extra_fields() {
        let parsed: Utxo = serde_json::from_value(json!({
            "id": "abc",
            "amount": 42,
            "valid_height": 7,
            "account_alias": "default",
            "change": false
        }))
        .unwrap();
        assert_eq!(parsed, Utxo { id: "abc".to_string(), amount: 42, valid_height: 7 });
        assert!(parsed.is_mature(7));
        assert!(!parsed.is_mature(6));
        assert!(matches!(
            serde_json::from_value::<Action>(json!({"type": "spend_account_unspent_output", "output_id": "z"})),
            Ok(Action::SpendAccountUnspentOutput { .. })
        ));
    }
}
