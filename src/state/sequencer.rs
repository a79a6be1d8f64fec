// ============================================================================
// REQUEST SEQUENCER - Descarta respuestas obsoletas de peticiones solapadas
// ============================================================================
// Cada petición recibe un ticket monotónico. Una respuesta solo se aplica
// si su ticket es más nuevo que el último aplicado y no fue invalidado.
// ============================================================================

use std::cell::Cell;

/// Ticket de una petición en vuelo
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: Cell<u64>,
    applied: Cell<u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        let next = self.issued.get() + 1;
        self.issued.set(next);
        Ticket(next)
    }

    /// ¿Se puede aplicar la respuesta de este ticket? Si sí, queda registrada
    pub fn try_apply(&self, ticket: Ticket) -> bool {
        if ticket.0 <= self.applied.get() {
            log::debug!("⏭️ [SEQ] Respuesta obsoleta descartada (#{} <= #{})", ticket.0, self.applied.get());
            return false;
        }
        self.applied.set(ticket.0);
        true
    }

    /// Solo el ticket más reciente emitido sigue vigente (selecciones de archivos, categoría)
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued.get()
    }

    /// Invalida todo lo que esté en vuelo: sus respuestas se descartarán
    pub fn invalidate(&self) {
        self.applied.set(self.issued.get());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_response_of_older_request_is_dropped() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        let second = seq.issue();
        assert!(seq.try_apply(second));
        assert!(!seq.try_apply(first));
    }

    #[test]
    fn in_order_responses_all_apply() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        assert!(seq.try_apply(first));
        let second = seq.issue();
        assert!(seq.try_apply(second));
        assert!(!seq.try_apply(second));
    }

    #[test]
    fn invalidate_drops_everything_in_flight() {
        let seq = RequestSequencer::new();
        let pending = seq.issue();
        seq.invalidate();
        assert!(!seq.try_apply(pending));
        let fresh = seq.issue();
        assert!(seq.try_apply(fresh));
    }

    #[test]
    fn only_newest_ticket_is_latest() {
        let seq = RequestSequencer::new();
        let a = seq.issue();
        assert!(seq.is_latest(a));
        let b = seq.issue();
        assert!(!seq.is_latest(a));
        assert!(seq.is_latest(b));
    }
}
