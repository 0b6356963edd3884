//! Stateless credit aging. Status and outstanding balance are a pure
//! function of the stored fields plus the current time, recomputed on every
//! read and never persisted, so they cannot drift from their inputs.

use crate::models::{CreditStatus, Nota, NotaView};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

/// Days of credit granted at delivery.
pub const PLAZO_DIAS: i64 = 15;

/// Days before the due date at which a nota is flagged as about to expire.
const POR_VENCER_DIAS: i64 = 3;

/// Derived credit fields for a nota at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Credito {
    pub saldo: Option<Decimal>,
    pub status: CreditStatus,
}

pub fn compute_credito(nota: &Nota, now: DateTime<Utc>) -> Credito {
    // Saldo is reported whenever the total is known, even before delivery.
    let saldo = nota.total.map(|t| (t - nota.pagado).max(Decimal::ZERO));

    let status = if nota.delivered_at.is_none() {
        CreditStatus::PreEntrega
    } else if nota.total.is_some() && saldo == Some(Decimal::ZERO) {
        CreditStatus::Liquidado
    } else if let Some(due) = nota.due_at {
        if now >= due {
            CreditStatus::Vencido
        } else if due - now < Duration::days(POR_VENCER_DIAS) {
            CreditStatus::PorVencer
        } else {
            CreditStatus::EnPlazo
        }
    } else {
        // Delivered but no due date on record, an inconsistent state.
        CreditStatus::EnPlazo
    };

    Credito { saldo, status }
}

/// Attach the derived credit fields to a nota for the wire.
pub fn to_view(nota: Nota, now: DateTime<Utc>) -> NotaView {
    let credito = compute_credito(&nota, now);
    NotaView {
        nota,
        saldo: credito.saldo,
        status_credito: credito.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn nota(total: Option<&str>, pagado: &str) -> Nota {
        Nota {
            id: "n1".to_string(),
            batch_key: "2026-03-02".to_string(),
            original_name: "nota.pdf".to_string(),
            filename: "2026-03-02__n1__nota.pdf".to_string(),
            cliente: None,
            total: total.map(dec),
            pagado: dec(pagado),
            delivered_at: None,
            due_at: None,
            first_payment_at: None,
            uploaded_at: Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap(),
        }
    }

    fn delivered(total: Option<&str>, pagado: &str, at: DateTime<Utc>) -> Nota {
        let mut n = nota(total, pagado);
        n.delivered_at = Some(at);
        n.due_at = Some(at + Duration::days(PLAZO_DIAS));
        n
    }

    #[test]
    fn undelivered_is_pre_entrega_with_saldo() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let c = compute_credito(&nota(Some("100"), "0"), now);
        assert_eq!(c.status, CreditStatus::PreEntrega);
        assert_eq!(c.saldo, Some(dec("100")));
    }

    #[test]
    fn unknown_total_has_unknown_saldo() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let c = compute_credito(&delivered(None, "0", now), now);
        assert_eq!(c.saldo, None);
        assert_eq!(c.status, CreditStatus::EnPlazo);
    }

    #[test]
    fn aging_thresholds_across_the_credit_window() {
        let t = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let n = delivered(Some("100"), "0", t);

        // Exactly three days remaining is still within the window.
        let c = compute_credito(&n, t + Duration::days(12));
        assert_eq!(c.status, CreditStatus::EnPlazo);

        let c = compute_credito(&n, t + Duration::days(13));
        assert_eq!(c.status, CreditStatus::PorVencer);

        // A second under the three-day mark tips it over.
        let c = compute_credito(&n, t + Duration::days(12) + Duration::seconds(1));
        assert_eq!(c.status, CreditStatus::PorVencer);

        let c = compute_credito(&n, t + Duration::days(16));
        assert_eq!(c.status, CreditStatus::Vencido);

        // Exactly at the due instant the nota is already overdue.
        let c = compute_credito(&n, t + Duration::days(PLAZO_DIAS));
        assert_eq!(c.status, CreditStatus::Vencido);
    }

    #[test]
    fn settled_nota_is_liquidado_and_overpayment_clamps_saldo() {
        let t = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let n = delivered(Some("100"), "150", t);
        let c = compute_credito(&n, t + Duration::days(1));
        assert_eq!(c.saldo, Some(Decimal::ZERO));
        assert_eq!(c.status, CreditStatus::Liquidado);
    }

    #[test]
    fn liquidado_wins_over_overdue() {
        let t = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let n = delivered(Some("100"), "100", t);
        let c = compute_credito(&n, t + Duration::days(30));
        assert_eq!(c.status, CreditStatus::Liquidado);
    }

    #[test]
    fn pure_function_same_inputs_same_output() {
        let t = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let n = delivered(Some("250.50"), "100", t);
        let now = t + Duration::days(5);
        assert_eq!(compute_credito(&n, now), compute_credito(&n, now));
    }
}
