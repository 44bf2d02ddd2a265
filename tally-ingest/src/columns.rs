//! Mapping trailing monetary tokens to column roles.
//!
//! A transaction row ends in one to three amounts whose roles depend on
//! count. Three tokens follow the statement family's fixed column order;
//! two are ambiguous between (paid-out, balance) and (paid-in, balance);
//! a lone token has no balance anchor at all. The mapping is a swappable
//! policy so other statement layouts can supply a different column order
//! without touching the reconciliation engine.

use tally_core::{Sign, SignResolution};

use crate::types::MonetaryToken;

/// Role assignment for a block's trailing tokens. At most one of
/// `paid_out`/`paid_in` ends up populated once the sign is resolved;
/// `balance` is present only when the row carried a running-balance figure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnRoles {
    pub paid_out: Option<MonetaryToken>,
    pub paid_in: Option<MonetaryToken>,
    pub balance: Option<MonetaryToken>,
}

/// Provisional amount for one block: either already signed (the row carried
/// distinct columns or an explicitly negative token) or a magnitude whose
/// direction the reconciliation engine settles later.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub roles: ColumnRoles,
    pub amount_abs: f64,
    /// Signed amount when the sign is already known.
    pub signed: Option<f64>,
    /// Resolution path when `signed` is known.
    pub resolution: Option<SignResolution>,
    /// Direction assumed when neither balance delta nor keyword settles it.
    pub fallback: Sign,
}

/// Strategy mapping 1–3 tokens to column roles.
pub trait ColumnPolicy {
    fn assign(&self, tokens: Vec<MonetaryToken>, hint: Option<Sign>) -> Assignment;
}

/// The common single-account layout: paid-out, paid-in, balance, in that
/// order. This ordering is a convention of the statement family, not a
/// detectable property of the text.
pub struct PaidOutPaidInBalance;

impl ColumnPolicy for PaidOutPaidInBalance {
    fn assign(&self, mut tokens: Vec<MonetaryToken>, hint: Option<Sign>) -> Assignment {
        match tokens.len() {
            3 => {
                let balance = tokens.pop();
                let paid_in = tokens.pop().expect("len checked");
                let paid_out = tokens.pop().expect("len checked");

                // Positional mapping only: no keyword disambiguation when
                // all three columns are present.
                let in_value = paid_in.value();
                let out_value = paid_out.value();
                let signed = if in_value > 0.0 { in_value } else { -out_value };

                Assignment {
                    roles: ColumnRoles {
                        paid_out: Some(paid_out),
                        paid_in: Some(paid_in),
                        balance,
                    },
                    amount_abs: signed.abs(),
                    signed: Some(signed),
                    resolution: Some(SignResolution::ExplicitColumn),
                    fallback: Sign::Credit,
                }
            }
            2 => {
                let balance = tokens.pop();
                let amount = tokens.pop().expect("len checked");
                let value = amount.value();

                // A parenthesised first token is an explicit outflow;
                // otherwise the sign stays provisional and the engine
                // reconciles it against the balance delta. The keyword hint
                // picks which column the token is recorded under, and the
                // conservative default assumes an outflow.
                let (roles, fallback) = if matches!(hint, Some(Sign::Credit)) {
                    (
                        ColumnRoles {
                            paid_in: Some(amount),
                            balance,
                            ..Default::default()
                        },
                        Sign::Credit,
                    )
                } else {
                    (
                        ColumnRoles {
                            paid_out: Some(amount),
                            balance,
                            ..Default::default()
                        },
                        Sign::Debit,
                    )
                };

                let (signed, resolution) = if value < 0.0 {
                    (Some(value), Some(SignResolution::ExplicitColumn))
                } else {
                    (None, None)
                };

                Assignment {
                    roles,
                    amount_abs: value.abs(),
                    signed,
                    resolution,
                    fallback,
                }
            }
            1 => {
                let amount = tokens.pop().expect("len checked");
                let value = amount.value();
                let (signed, resolution) = if value < 0.0 {
                    (Some(value), Some(SignResolution::ExplicitColumn))
                } else {
                    (None, None)
                };

                Assignment {
                    roles: ColumnRoles::default(),
                    amount_abs: value.abs(),
                    signed,
                    resolution,
                    fallback: Sign::Credit,
                }
            }
            n => unreachable!("column policy called with {n} tokens"),
        }
    }
}
