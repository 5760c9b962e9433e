//! Control protocol endpoints
//!
//! The line-oriented operator protocol: one endpoint per configuration
//! surface (global enable, global period, domain budgets, client control),
//! each with a report (read) and an apply (bulk write) operation. Whatever
//! transport fronts the control plane — CLI, socket, file — parses nothing
//! itself; it hands the raw record here.
//!
//! # Token discipline
//!
//! A write record is a whitespace-separated sequence of decimal u64s,
//! consumed left to right, one entity at a time in ascending index order.
//! The first missing or malformed token ends the record: remaining entities
//! keep their previous state, and the request still succeeds. The only way
//! to learn how far a truncated record got is to re-read the report.
//!
//! # Consistency
//!
//! All endpoints serialize on one lock per window, so a report is a
//! consistent snapshot and a multi-field apply (notably client control,
//! whose domain masks land before the shared enable word) is atomic with
//! respect to every other endpoint call. Callers that want the raw,
//! unserialized semantics can drive [`Bru`] directly.

use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{BruError, Result};
use crate::regs::Bru;
use crate::window::RegisterWindow;

/// Serialized control-plane endpoints for one BRU window.
#[derive(Debug)]
pub struct ControlPlane<W: RegisterWindow> {
    bru: Mutex<Bru<W>>,
}

impl<W: RegisterWindow> ControlPlane<W> {
    /// Wrap a codec instance behind the per-window lock.
    pub fn new(bru: Bru<W>) -> Self {
        Self {
            bru: Mutex::new(bru),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Bru<W>> {
        // Register state stays valid across a panicking holder; recover the
        // guard rather than wedging every subsequent request.
        self.bru.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Global enable ────────────────────────────────────────────────────

    /// `enabled: on` / `enabled: off`, from the live enable word.
    ///
    /// # Errors
    ///
    /// Returns an error only if the window access fails.
    pub fn enable_report(&self) -> Result<String> {
        let on = self.lock().global_enabled()?;
        Ok(format!("enabled: {}\n", if on { "on" } else { "off" }))
    }

    /// Store the first token of `record` as the raw enable value.
    /// Zero means off; any nonzero value reads back as on.
    ///
    /// # Errors
    ///
    /// Returns an error only if the window access fails.
    pub fn apply_enable(&self, record: &str) -> Result<()> {
        if let Some(raw) = first_token(record) {
            self.lock().set_global_enable(raw)?;
        }
        Ok(())
    }

    // ── Global period ────────────────────────────────────────────────────

    /// `period: {cycles} cycles`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the window access fails.
    pub fn period_report(&self) -> Result<String> {
        Ok(format!("period: {} cycles\n", self.lock().period()?))
    }

    /// Store the first token of `record` as the new period.
    ///
    /// # Errors
    ///
    /// Returns an error only if the window access fails.
    pub fn apply_period(&self, record: &str) -> Result<()> {
        if let Some(cycles) = first_token(record) {
            tracing::info!("Setting period to {cycles}");
            self.lock().set_period(cycles)?;
        }
        Ok(())
    }

    // ── Domain budgets ───────────────────────────────────────────────────

    /// Header line plus one `Domain {i}: {budget}` line per domain.
    ///
    /// # Errors
    ///
    /// Returns an error only if the window access fails.
    pub fn domain_report(&self) -> Result<String> {
        let bru = self.lock();
        let mut out = String::from("Domain N: budget (accesses)\n");
        for i in 0..bru.layout().domains {
            let _ = writeln!(out, "Domain {i}: {}", bru.domain_budget(i)?);
        }
        Ok(out)
    }

    /// Consume one budget token per domain in ascending order. A token of
    /// 0 is rejected for that domain only — logged, previous budget kept,
    /// processing continues with the next domain.
    ///
    /// # Errors
    ///
    /// Returns an error only if the window access fails; rejected budgets
    /// and truncated records are diagnostics, not failures.
    pub fn apply_domain_budgets(&self, record: &str) -> Result<()> {
        let mut bru = self.lock();
        let mut tokens = record.split_whitespace();
        for i in 0..bru.layout().domains {
            let Some(budget) = tokens.next().and_then(parse_u64) else {
                break;
            };
            match bru.set_domain_budget(i, budget) {
                Ok(()) => {}
                Err(e @ BruError::InvalidBudget { .. }) => {
                    tracing::error!("{e}");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    // ── Client control ───────────────────────────────────────────────────

    /// Header line plus one `Client {i}: yes|no\t{mask}` line per client.
    ///
    /// # Errors
    ///
    /// Returns an error only if the window access fails.
    pub fn client_report(&self) -> Result<String> {
        let bru = self.lock();
        let mut out = String::from("Client N: enable | domain\n");
        let enables = bru.client_enable_word()?;
        for i in 0..bru.layout().clients {
            let mask = bru.client_domain(i)?;
            let state = if (enables >> i) & 1 != 0 { "yes" } else { "no" };
            let _ = writeln!(out, "Client {i}: {state}\t{mask}");
        }
        Ok(out)
    }

    /// Consume `(enable, domain_mask)` token pairs in ascending client
    /// order. Each domain mask is written immediately; enable bits
    /// accumulate and the shared word is written exactly once at the end.
    /// The final word only replaces the supplied clients' bits — clients
    /// past a truncated record keep their previous enable state, and an
    /// incomplete trailing pair applies neither half.
    ///
    /// # Errors
    ///
    /// Returns an error only if the window access fails.
    pub fn apply_clients(&self, record: &str) -> Result<()> {
        let mut bru = self.lock();
        let mut tokens = record.split_whitespace();

        let mut enables = bru.client_enable_word()?;
        for i in 0..bru.layout().clients {
            let Some(enable) = tokens.next().and_then(parse_u64) else {
                break;
            };
            let Some(mask) = tokens.next().and_then(parse_u64) else {
                break;
            };
            enables = (enables & !(1u64 << i)) | ((enable & 1) << i);
            bru.set_client_domain(i, mask)?;
        }
        bru.set_client_enable_word(enables)
    }
}

/// First whitespace-separated decimal token, if any parses.
fn first_token(record: &str) -> Option<u64> {
    record.split_whitespace().next().and_then(parse_u64)
}

/// Decimal u64 parse; a malformed token is indistinguishable from a
/// missing one, ending the caller's loop either way.
fn parse_u64(token: &str) -> Option<u64> {
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::SimWindow;
    use bru_chip::Layout;

    fn plane(domains: usize, clients: usize) -> ControlPlane<SimWindow> {
        let layout = Layout::new(domains, clients);
        ControlPlane::new(Bru::new(SimWindow::for_layout(&layout), layout).unwrap())
    }

    #[test]
    fn deployment_scenario() {
        // N=1, M=1 — the concrete scenario the current silicon runs.
        let cp = plane(1, 1);

        cp.apply_domain_budgets("100").unwrap();
        assert_eq!(
            cp.domain_report().unwrap(),
            "Domain N: budget (accesses)\nDomain 0: 100\n"
        );

        cp.apply_clients("1 1").unwrap();
        assert_eq!(
            cp.client_report().unwrap(),
            "Client N: enable | domain\nClient 0: yes\t1\n"
        );

        cp.apply_period("5000").unwrap();
        assert_eq!(cp.period_report().unwrap(), "period: 5000 cycles\n");

        cp.apply_enable("1").unwrap();
        assert_eq!(cp.enable_report().unwrap(), "enabled: on\n");
    }

    #[test]
    fn zero_budget_rejected_others_proceed() {
        let cp = plane(3, 1);
        cp.apply_domain_budgets("10 20 30").unwrap();
        // Domain 1's zero is skipped; 0 and 2 still update.
        cp.apply_domain_budgets("11 0 33").unwrap();
        assert_eq!(
            cp.domain_report().unwrap(),
            "Domain N: budget (accesses)\nDomain 0: 11\nDomain 1: 20\nDomain 2: 33\n"
        );
    }

    #[test]
    fn truncated_budget_record_leaves_tail_unmodified() {
        let cp = plane(3, 1);
        cp.apply_domain_budgets("10 20 30").unwrap();
        cp.apply_domain_budgets("77").unwrap();
        assert_eq!(
            cp.domain_report().unwrap(),
            "Domain N: budget (accesses)\nDomain 0: 77\nDomain 1: 20\nDomain 2: 30\n"
        );
    }

    #[test]
    fn malformed_token_stops_like_truncation() {
        let cp = plane(3, 1);
        cp.apply_domain_budgets("10 20 30").unwrap();
        cp.apply_domain_budgets("44 bogus 99").unwrap();
        assert_eq!(
            cp.domain_report().unwrap(),
            "Domain N: budget (accesses)\nDomain 0: 44\nDomain 1: 20\nDomain 2: 30\n"
        );
    }

    #[test]
    fn enable_nonzero_is_on() {
        let cp = plane(1, 1);
        cp.apply_enable("2").unwrap();
        assert_eq!(cp.enable_report().unwrap(), "enabled: on\n");
        cp.apply_enable("0").unwrap();
        assert_eq!(cp.enable_report().unwrap(), "enabled: off\n");
    }

    #[test]
    fn empty_record_is_a_no_op() {
        let cp = plane(1, 1);
        cp.apply_period("5000").unwrap();
        cp.apply_period("").unwrap();
        cp.apply_period("   \n").unwrap();
        assert_eq!(cp.period_report().unwrap(), "period: 5000 cycles\n");
    }

    #[test]
    fn client_pairs_round_trip() {
        let cp = plane(2, 3);
        cp.apply_clients("1 1 0 2 1 2").unwrap();
        assert_eq!(
            cp.client_report().unwrap(),
            "Client N: enable | domain\n\
             Client 0: yes\t1\n\
             Client 1: no\t2\n\
             Client 2: yes\t2\n"
        );
    }

    #[test]
    fn truncated_client_record_leaves_tail_untouched() {
        let cp = plane(2, 3);
        cp.apply_clients("1 1 1 2 1 2").unwrap();
        // One pair supplied: client 0 flips off, clients 1/2 keep both
        // their enable bits and their masks.
        cp.apply_clients("0 2").unwrap();
        assert_eq!(
            cp.client_report().unwrap(),
            "Client N: enable | domain\n\
             Client 0: no\t2\n\
             Client 1: yes\t2\n\
             Client 2: yes\t2\n"
        );
    }

    #[test]
    fn incomplete_trailing_pair_applies_neither_half() {
        let cp = plane(2, 2);
        cp.apply_clients("1 1 1 2").unwrap();
        // Client 1 gets an enable token but no mask: its enable bit and
        // mask both stay as they were.
        cp.apply_clients("0 1 1").unwrap();
        assert_eq!(
            cp.client_report().unwrap(),
            "Client N: enable | domain\n\
             Client 0: no\t1\n\
             Client 1: yes\t2\n"
        );
    }
}
