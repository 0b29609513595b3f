//! Extraction prompt sent with every scan.

/// Instructions for the vision model.
///
/// The model must answer with strict JSON only; the parsing in
/// [`crate::result`] tolerates a fenced code block but nothing looser.
pub const EXTRACTION_PROMPT: &str = r#"You are an expert in interpreting appliance rating tags with OCR error correction.

Extract BOTH the MODEL NUMBER and SERIAL NUMBER from the photo, and identify HOW each was obtained: from a barcode, a QR code, or printed text.

Rules:
- Barcode and QR data, when clear, are the most reliable sources and take priority over printed text.
- High-risk OCR characters [O, 0, S, 5, B, 8, 1, I, L, Z, 2, G, 6, C, D] must be validated against known brand patterns (e.g. Kenmore "111.########", Whirlpool "W" prefixes) before being accepted; pick the interpretation that matches a known pattern.
- Appliance model numbers end in a numeric digit: a trailing letter 'O' is always the numeral '0'.
- Rejoin model numbers split across lines and remove spaces inserted inside them (e.g. "W OS51 EC0HS20" is "WOS51EC0HS20").
- If a correction was applied, describe it briefly; otherwise use "none".

Answer with JSON only, no prose, in exactly this shape:
{"model_number": "...", "serial_number": "...", "confidence": "high|medium|low", "corrections": "...", "scan_type": "barcode|qr|ocr|mixed"}"#;
