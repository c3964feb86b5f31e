//! Call-recording engine for unit tests.

use super::{BigDecimalEngine, Context, DecimalEngine, EngineResult};
use ::bigdecimal::BigDecimal;
use std::cell::RefCell;

/// Delegates to [`BigDecimalEngine`] and records every method name called.
#[derive(Debug, Default)]
pub struct SpyEngine {
    inner: BigDecimalEngine,
    calls: RefCell<Vec<&'static str>>,
}

impl SpyEngine {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn note(&self, name: &'static str) {
        self.calls.borrow_mut().push(name);
    }
}

impl DecimalEngine for SpyEngine {
    type Value = BigDecimal;

    fn parse(&self, literal: &str, working_precision: u32) -> EngineResult<BigDecimal> {
        self.note("parse");
        self.inner.parse(literal, working_precision)
    }

    fn round(&self, value: &BigDecimal, ctx: &Context) -> BigDecimal {
        self.note("round");
        self.inner.round(value, ctx)
    }

    fn render(&self, value: &BigDecimal) -> String {
        self.note("render");
        self.inner.render(value)
    }

    fn abs(&self, x: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("abs");
        self.inner.abs(x, ctx)
    }

    fn exp(&self, x: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("exp");
        self.inner.exp(x, ctx)
    }

    fn ln(&self, x: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("ln");
        self.inner.ln(x, ctx)
    }

    fn sqrt(&self, x: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("sqrt");
        self.inner.sqrt(x, ctx)
    }

    fn add(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("add");
        self.inner.add(x, y, ctx)
    }

    fn subtract(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("subtract");
        self.inner.subtract(x, y, ctx)
    }

    fn multiply(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("multiply");
        self.inner.multiply(x, y, ctx)
    }

    fn divide(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("divide");
        self.inner.divide(x, y, ctx)
    }

    fn power(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("power");
        self.inner.power(x, y, ctx)
    }

    fn remainder(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("remainder");
        self.inner.remainder(x, y, ctx)
    }

    fn max(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("max");
        self.inner.max(x, y, ctx)
    }

    fn min(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("min");
        self.inner.min(x, y, ctx)
    }

    fn compare(&self, x: &BigDecimal, y: &BigDecimal, ctx: &Context) -> EngineResult<BigDecimal> {
        self.note("compare");
        self.inner.compare(x, y, ctx)
    }
}
