//! Observability for License Navigator: tracing subscriber setup with
//! optional OpenTelemetry span export.
//!
//! LLM calls are recorded as spans carrying OTel GenAI semantic-convention
//! fields (`gen_ai.operation.name`, `gen_ai.provider.name`,
//! `gen_ai.request.model`, `gen_ai.usage.*`); with `otel` enabled they are
//! exported as-is.

pub mod tracing_setup;
