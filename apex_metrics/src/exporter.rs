use crate::{error::Result, registry::ApexMetrics};
use prometheus::{Encoder, TextEncoder};

/// `Content-Type` of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub struct PrometheusExporter;

impl PrometheusExporter {
    pub fn format(metrics: &ApexMetrics) -> Result<String> {
        let families = metrics.registry().gather();
        let mut buffer = Vec::with_capacity(8 * 1024);
        TextEncoder::new().encode(&families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
