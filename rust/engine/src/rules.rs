use serde::{Deserialize, Serialize};

use crate::errors::IllegalAction;
use crate::player::PlayerAction as A;

/// Everything action validation needs to know about the acting player and the
/// live betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    /// Chips behind
    pub stack: u32,
    /// Already committed this round
    pub round_bet: u32,
    /// Highest round bet anyone has made
    pub current_bet: u32,
    /// Minimum raise increment over `current_bet`
    pub min_raise: u32,
    /// False after an incomplete all-in raise for players who had already acted
    pub can_raise: bool,
}

impl ActionContext {
    pub fn to_call(&self) -> u32 {
        self.current_bet.saturating_sub(self.round_bet)
    }

    /// The largest round bet the player can reach (all-in).
    pub fn max_total(&self) -> u32 {
        self.round_bet + self.stack
    }

    pub fn min_raise_to(&self) -> u32 {
        self.current_bet + self.min_raise
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips added to match the current bet
    Call(u32),
    /// Opening bet, as the new round total
    Bet(u32),
    /// Raise, as the new round total
    Raise(u32),
    /// Whole remaining stack, as chips added
    AllIn(u32),
}

/// Validates a player action according to betting rules and stack size.
///
/// Converts a [`crate::player::PlayerAction`] into a [`ValidatedAction`]. A
/// call the stack cannot cover, and a bet or raise to exactly the player's
/// whole stack, become [`ValidatedAction::AllIn`].
///
/// # Errors
///
/// - [`IllegalAction::CannotCheck`] - check while facing a bet
/// - [`IllegalAction::NothingToCall`] - call with nothing to call
/// - [`IllegalAction::BetFacingBet`] - bet when a bet already stands
/// - [`IllegalAction::RaiseTooSmall`] - raise below `current_bet + min_raise`
/// - [`IllegalAction::InsufficientChips`] - raise beyond the stack
/// - [`IllegalAction::RaisingClosed`] - raise after an incomplete all-in raise
///
/// # Examples
///
/// ```
/// use lounge_engine::rules::{validate_action, ActionContext, ValidatedAction};
/// use lounge_engine::player::PlayerAction;
///
/// let ctx = ActionContext { stack: 990, round_bet: 10, current_bet: 50, min_raise: 40, can_raise: true };
/// assert_eq!(validate_action(&ctx, PlayerAction::Call), Ok(ValidatedAction::Call(40)));
/// assert_eq!(validate_action(&ctx, PlayerAction::Raise(90)), Ok(ValidatedAction::Raise(90)));
/// assert!(validate_action(&ctx, PlayerAction::Raise(80)).is_err());
/// assert_eq!(validate_action(&ctx, PlayerAction::Raise(1000)), Ok(ValidatedAction::AllIn(990)));
/// ```
pub fn validate_action(ctx: &ActionContext, action: A) -> Result<ValidatedAction, IllegalAction> {
    let to_call = ctx.to_call();
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(IllegalAction::CannotCheck { to_call })
            }
        }
        A::Call => {
            if to_call == 0 {
                Err(IllegalAction::NothingToCall)
            } else if ctx.stack <= to_call {
                Ok(ValidatedAction::AllIn(ctx.stack))
            } else {
                Ok(ValidatedAction::Call(to_call))
            }
        }
        A::Bet(to) => {
            if ctx.current_bet > 0 {
                return Err(IllegalAction::BetFacingBet);
            }
            validate_raise(ctx, to).map(|v| match v {
                ValidatedAction::Raise(to) => ValidatedAction::Bet(to),
                other => other,
            })
        }
        A::Raise(to) => {
            let v = validate_raise(ctx, to)?;
            if ctx.current_bet == 0 {
                // nothing to raise yet: this opens the betting
                if let ValidatedAction::Raise(to) = v {
                    return Ok(ValidatedAction::Bet(to));
                }
            }
            Ok(v)
        }
        A::AllIn => {
            if ctx.stack == 0 {
                return Err(IllegalAction::InsufficientChips {
                    required: 1,
                    available: 0,
                });
            }
            if !ctx.can_raise && ctx.stack > to_call {
                return Err(IllegalAction::RaisingClosed);
            }
            Ok(ValidatedAction::AllIn(ctx.stack))
        }
    }
}

fn validate_raise(ctx: &ActionContext, to: u32) -> Result<ValidatedAction, IllegalAction> {
    if !ctx.can_raise {
        return Err(IllegalAction::RaisingClosed);
    }
    let max = ctx.max_total();
    if to > max {
        return Err(IllegalAction::InsufficientChips {
            required: to - ctx.round_bet,
            available: ctx.stack,
        });
    }
    if to == max && to > ctx.current_bet {
        return Ok(ValidatedAction::AllIn(ctx.stack));
    }
    let minimum = ctx.min_raise_to();
    if to < minimum {
        return Err(IllegalAction::RaiseTooSmall {
            amount: to,
            minimum,
        });
    }
    Ok(ValidatedAction::Raise(to))
}

/// What the player on turn may do, for UIs and bots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub can_check: bool,
    /// Chips a call adds (short if the stack cannot cover it)
    pub call_amount: Option<u32>,
    /// Smallest legal raise-to; equals `max_raise_to` when only all-in remains
    pub min_raise_to: Option<u32>,
    pub max_raise_to: Option<u32>,
}

pub fn legal_actions(ctx: &ActionContext) -> LegalActions {
    let to_call = ctx.to_call();
    let max = ctx.max_total();
    let can_raise = ctx.can_raise && max > ctx.current_bet;
    LegalActions {
        can_check: to_call == 0,
        call_amount: (to_call > 0).then(|| to_call.min(ctx.stack)),
        min_raise_to: can_raise.then(|| ctx.min_raise_to().min(max)),
        max_raise_to: can_raise.then_some(max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(stack: u32, round_bet: u32, current_bet: u32, min_raise: u32) -> ActionContext {
        ActionContext {
            stack,
            round_bet,
            current_bet,
            min_raise,
            can_raise: true,
        }
    }

    #[test]
    fn check_only_when_nothing_to_call() {
        assert_eq!(
            validate_action(&ctx(100, 10, 10, 10), A::Check),
            Ok(ValidatedAction::Check)
        );
        assert_eq!(
            validate_action(&ctx(100, 5, 10, 10), A::Check),
            Err(IllegalAction::CannotCheck { to_call: 5 })
        );
    }

    #[test]
    fn short_call_is_all_in() {
        assert_eq!(
            validate_action(&ctx(30, 0, 50, 50), A::Call),
            Ok(ValidatedAction::AllIn(30))
        );
        assert_eq!(
            validate_action(&ctx(100, 50, 50, 50), A::Call),
            Err(IllegalAction::NothingToCall)
        );
    }

    #[test]
    fn bet_only_into_unopened_round() {
        assert_eq!(
            validate_action(&ctx(100, 0, 0, 10), A::Bet(20)),
            Ok(ValidatedAction::Bet(20))
        );
        assert_eq!(
            validate_action(&ctx(100, 0, 10, 10), A::Bet(20)),
            Err(IllegalAction::BetFacingBet)
        );
        assert_eq!(
            validate_action(&ctx(100, 0, 0, 10), A::Raise(20)),
            Ok(ValidatedAction::Bet(20))
        );
    }

    #[test]
    fn raise_bounds() {
        let c = ctx(200, 0, 50, 50);
        assert_eq!(
            validate_action(&c, A::Raise(99)),
            Err(IllegalAction::RaiseTooSmall {
                amount: 99,
                minimum: 100
            })
        );
        assert_eq!(validate_action(&c, A::Raise(100)), Ok(ValidatedAction::Raise(100)));
        assert_eq!(validate_action(&c, A::Raise(200)), Ok(ValidatedAction::AllIn(200)));
        assert_eq!(
            validate_action(&c, A::Raise(201)),
            Err(IllegalAction::InsufficientChips {
                required: 201,
                available: 200
            })
        );
    }

    #[test]
    fn raising_closed_still_allows_calls() {
        let mut c = ctx(500, 100, 150, 100);
        c.can_raise = false;
        assert_eq!(validate_action(&c, A::Call), Ok(ValidatedAction::Call(50)));
        assert_eq!(
            validate_action(&c, A::Raise(400)),
            Err(IllegalAction::RaisingClosed)
        );
        assert_eq!(validate_action(&c, A::AllIn), Err(IllegalAction::RaisingClosed));
        c.stack = 40;
        assert_eq!(validate_action(&c, A::AllIn), Ok(ValidatedAction::AllIn(40)));
    }

    #[test]
    fn legal_actions_report_all_in_floor() {
        let la = legal_actions(&ctx(60, 0, 50, 50));
        assert!(!la.can_check);
        assert_eq!(la.call_amount, Some(50));
        assert_eq!(la.min_raise_to, Some(60));
        assert_eq!(la.max_raise_to, Some(60));

        let la = legal_actions(&ctx(40, 0, 50, 50));
        assert_eq!(la.call_amount, Some(40));
        assert_eq!(la.min_raise_to, None);
    }
}
