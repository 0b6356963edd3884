//! Portfolio aggregations over delivered notas: collection KPIs and the
//! faltantes follow-up ranking. Both are computed freshly from the full
//! record set on every call.

use crate::models::{Nota, NotaView};
use crate::services::credito;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Fixed margin estimate applied to collected and outstanding amounts.
fn margen() -> Decimal {
    Decimal::new(4, 1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_cobrable: Decimal,
    pub total_cobrado: Decimal,
    pub total_saldo: Decimal,
    pub pct_cobranza: Decimal,
    pub utilidad_cobrada: Decimal,
    pub utilidad_por_cobrar: Decimal,
}

/// Roll up collectible/collected/outstanding totals across delivered notas.
///
/// Payments are capped per-record at that record's own total, so an
/// overpaid nota cannot inflate the portfolio-level collected figure.
pub fn compute_kpis(notas: &[Nota]) -> Kpis {
    let mut cobrable = Decimal::ZERO;
    let mut cobrado = Decimal::ZERO;

    for nota in notas.iter().filter(|n| n.delivered_at.is_some()) {
        let total = nota.total.unwrap_or(Decimal::ZERO);
        cobrable += total;
        cobrado += nota.pagado.min(total);
    }

    let saldo = (cobrable - cobrado).max(Decimal::ZERO);
    let pct = if cobrable > Decimal::ZERO {
        cobrado / cobrable
    } else {
        Decimal::ZERO
    };

    Kpis {
        total_cobrable: cobrable,
        total_cobrado: cobrado,
        total_saldo: saldo,
        pct_cobranza: pct,
        utilidad_cobrada: cobrado * margen(),
        utilidad_por_cobrar: saldo * margen(),
    }
}

/// Delivered notas that still need follow-up, most urgent first.
///
/// A nota with no extractable total has an unknown saldo and is kept in the
/// list alongside the positive balances. Ordering: status urgency
/// (VENCIDO, POR_VENCER, EN_PLAZO, rest), then due date ascending with
/// missing due dates last.
pub fn rank_faltantes(notas: &[Nota], now: DateTime<Utc>) -> Vec<NotaView> {
    let mut faltantes: Vec<NotaView> = notas
        .iter()
        .filter(|n| n.delivered_at.is_some())
        .map(|n| credito::to_view(n.clone(), now))
        .filter(|v| match v.saldo {
            Some(saldo) => saldo > Decimal::ZERO,
            None => true,
        })
        .collect();

    faltantes.sort_by(|a, b| {
        a.status_credito
            .urgency_rank()
            .cmp(&b.status_credito.urgency_rank())
            .then_with(|| match (a.nota.due_at, b.nota.due_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
    });

    faltantes
}
