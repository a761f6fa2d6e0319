//! Template parsing, slot binding and instantiation.

use rand::Rng;
use std::collections::BTreeMap;

use crate::config::{SlotFiller, TemplatePair, Weights};
use crate::error::{GenerationError, Result};
use crate::models::{BinaryOp, Formula};
use crate::services::sampler::sample_weighted;

/// Variables handed out to slots, in order.
pub const INFERENCE_VARS: [&str; 11] = ["p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z"];

/// Slot name to the formula filling it.
pub type Bindings = BTreeMap<String, Formula>;

/// A template pair with its patterns parsed into formulas over slot names.
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    pub name: String,
    pub premises: Vec<Formula>,
    pub valid: Vec<Formula>,
    pub invalid: Vec<Formula>,
}

impl ParsedTemplate {
    pub fn parse(pair: &TemplatePair) -> Result<ParsedTemplate> {
        if pair.valid.is_empty() {
            return Err(GenerationError::InvalidTemplate(format!("{} has no valid conclusions", pair.name)));
        }
        let parse_all = |patterns: &[crate::config::ExprPattern], what: &str| -> Result<Vec<Formula>> {
            patterns
                .iter()
                .map(|p| {
                    p.to_formula()
                        .map_err(|e| GenerationError::InvalidTemplate(format!("{} {}: {}", pair.name, what, e)))
                })
                .collect()
        };
        Ok(ParsedTemplate {
            name: pair.name.clone(),
            premises: parse_all(pair.premises.as_slice(), "premise")?,
            valid: parse_all(pair.valid.as_slice(), "valid conclusion")?,
            invalid: parse_all(pair.invalid.as_slice(), "invalid conclusion")?,
        })
    }

    /// Substitute `bindings` into every pattern.
    pub fn instantiate(&self, bindings: &Bindings) -> Result<(Vec<Formula>, Vec<Formula>, Vec<Formula>)> {
        let fill = |patterns: &[Formula]| -> Result<Vec<Formula>> {
            patterns
                .iter()
                .map(|p| {
                    instantiate(p, bindings).map_err(|slot| {
                        GenerationError::InvalidTemplate(format!("{} uses undeclared slot {}", self.name, slot))
                    })
                })
                .collect()
        };
        Ok((
            fill(self.premises.as_slice())?,
            fill(self.valid.as_slice())?,
            fill(self.invalid.as_slice())?,
        ))
    }
}

/// Replace slot variables; an unbound slot is returned as the error.
pub fn instantiate(pattern: &Formula, bindings: &Bindings) -> std::result::Result<Formula, String> {
    match pattern {
        Formula::Var(slot) => bindings.get(slot).cloned().ok_or_else(|| slot.clone()),
        Formula::Not(inner) => Ok(Formula::Not(Box::new(instantiate(inner, bindings)?))),
        _ => match pattern.as_binary() {
            Some((op, left, right)) => Ok(Formula::binary(op, instantiate(left, bindings)?, instantiate(right, bindings)?)),
            None => Err(pattern.to_string()),
        },
    }
}

struct VarSupply {
    next: usize,
}

impl VarSupply {
    fn take(&mut self) -> Result<Formula> {
        let name = INFERENCE_VARS.get(self.next).ok_or_else(|| {
            GenerationError::InvalidTemplate(format!("template needs more than {} variables", INFERENCE_VARS.len()))
        })?;
        self.next += 1;
        Ok(Formula::var(*name))
    }
}

fn build_filler(filler: SlotFiller, vars: &mut VarSupply) -> Result<Formula> {
    Ok(match filler {
        SlotFiller::UseVar => vars.take()?,
        SlotFiller::UseNegVar => vars.take()?.negate(),
        SlotFiller::UseAnd => {
            let left = vars.take()?;
            Formula::binary(BinaryOp::And, left, vars.take()?)
        }
        SlotFiller::UseOr => {
            let left = vars.take()?;
            Formula::binary(BinaryOp::Or, left, vars.take()?)
        }
        SlotFiller::UseConstTrue => {
            let v = vars.take()?;
            Formula::binary(BinaryOp::Or, v.clone(), v.negate())
        }
        SlotFiller::UseConstFalse => {
            let v = vars.take()?;
            Formula::binary(BinaryOp::And, v.clone(), v.negate())
        }
    })
}

/// Fill every slot in name order with fresh variables, the shape drawn
/// from the slot type's filler distribution.
pub fn prepare_bindings<R: Rng + ?Sized>(
    rng: &mut R,
    slots: &BTreeMap<String, String>,
    fillers: &BTreeMap<String, Weights<SlotFiller>>,
) -> Result<Bindings> {
    let mut vars = VarSupply { next: 0 };
    let mut bindings = Bindings::new();
    for (slot, slot_type) in slots {
        let dist = fillers
            .get(slot_type)
            .ok_or_else(|| GenerationError::missing(format!("slot filler spec for slot type '{}'", slot_type)))?;
        let filler = sample_weighted(dist, rng).unwrap_or(SlotFiller::UseVar);
        bindings.insert(slot.clone(), build_filler(filler, &mut vars)?);
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExprPattern;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pair(slots: &[(&str, &str)], premises: &[&str], valid: &[&str], invalid: &[&str]) -> TemplatePair {
        let pats = |xs: &[&str]| xs.iter().map(|s| ExprPattern::Text(s.to_string())).collect();
        TemplatePair {
            name: "test".into(),
            description: String::new(),
            chain_steps: 1,
            slots: slots.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            premises: pats(premises),
            valid: pats(valid),
            invalid: pats(invalid),
        }
    }

    fn fillers(entries: &[(&str, SlotFiller)]) -> BTreeMap<String, Weights<SlotFiller>> {
        entries
            .iter()
            .map(|(t, f)| (t.to_string(), [(*f, 1.0)].into_iter().collect()))
            .collect()
    }

    #[test]
    fn test_bindings_follow_slot_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let slots: BTreeMap<String, String> =
            [("C", "atom"), ("A", "pair"), ("B", "neg")].iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let fillers = fillers(&[
            ("atom", SlotFiller::UseVar),
            ("pair", SlotFiller::UseAnd),
            ("neg", SlotFiller::UseNegVar),
        ]);
        let bindings = prepare_bindings(&mut rng, &slots, &fillers).unwrap();
        assert_eq!(bindings["A"].to_string(), "p ∧ q");
        assert_eq!(bindings["B"].to_string(), "¬r");
        assert_eq!(bindings["C"].to_string(), "s");
    }

    #[test]
    fn test_constant_fillers() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let slots: BTreeMap<String, String> =
            [("A", "t"), ("B", "f")].iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let fillers = fillers(&[("t", SlotFiller::UseConstTrue), ("f", SlotFiller::UseConstFalse)]);
        let bindings = prepare_bindings(&mut rng, &slots, &fillers).unwrap();
        assert_eq!(bindings["A"].to_string(), "p ∨ ¬p");
        assert_eq!(bindings["B"].to_string(), "q ∧ ¬q");
    }

    #[test]
    fn test_empty_filler_distribution_defaults_to_var() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let slots: BTreeMap<String, String> = [("A".to_string(), "any".to_string())].into_iter().collect();
        let fillers: BTreeMap<String, Weights<SlotFiller>> = [("any".to_string(), Weights::new())].into_iter().collect();
        let bindings = prepare_bindings(&mut rng, &slots, &fillers).unwrap();
        assert_eq!(bindings["A"], Formula::var("p"));
    }

    #[test]
    fn test_missing_slot_type_is_config_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let slots: BTreeMap<String, String> = [("A".to_string(), "mystery".to_string())].into_iter().collect();
        let err = prepare_bindings(&mut rng, &slots, &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, GenerationError::ConfigMissing(_)));
    }

    #[test]
    fn test_running_out_of_variables() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let slots: BTreeMap<String, String> = (0..6).map(|i| (format!("S{}", i), "pair".to_string())).collect();
        let err = prepare_bindings(&mut rng, &slots, &fillers(&[("pair", SlotFiller::UseOr)])).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidTemplate(_)));
    }

    #[test]
    fn test_parse_and_instantiate() {
        let template = ParsedTemplate::parse(&pair(&[("A", "atom"), ("B", "atom")], &["A -> B", "A"], &["B"], &["~B"])).unwrap();
        let bindings: Bindings = [("A".to_string(), Formula::var("p").negate()), ("B".to_string(), Formula::var("q"))]
            .into_iter()
            .collect();
        let (premises, valid, invalid) = template.instantiate(&bindings).unwrap();
        assert_eq!(premises[0].to_string(), "¬p → q");
        assert_eq!(premises[1].to_string(), "¬p");
        assert_eq!(valid[0].to_string(), "q");
        assert_eq!(invalid[0].to_string(), "¬q");
    }

    #[test]
    fn test_template_errors() {
        let no_valid = pair(&[("A", "atom")], &["A"], &[], &["~A"]);
        assert!(matches!(ParsedTemplate::parse(&no_valid), Err(GenerationError::InvalidTemplate(_))));

        let malformed = pair(&[("A", "atom")], &["A ->"], &["A"], &[]);
        assert!(matches!(ParsedTemplate::parse(&malformed), Err(GenerationError::InvalidTemplate(_))));

        let undeclared = ParsedTemplate::parse(&pair(&[("A", "atom")], &["A -> Z"], &["A"], &[])).unwrap();
        let bindings: Bindings = [("A".to_string(), Formula::var("p"))].into_iter().collect();
        assert!(matches!(undeclared.instantiate(&bindings), Err(GenerationError::InvalidTemplate(_))));
    }
}
