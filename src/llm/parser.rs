//! Parse natural language requests into structured CAD intents
//!
//! The LLM converts the user's request into one JSON intent and nothing
//! else; decomposition, reference resolution, and execution stay inside
//! the deterministic engine. Keeping the model out of the geometry loop is
//! what makes runs reproducible.

use crate::core::error::{EngineError, Result};
use crate::intent::CadIntent;
use crate::llm::client::LlmClient;
use crate::llm::context::ModelContext;

/// Parse a natural language request into a structured intent
///
/// # Arguments
/// * `client` - The LLM client to use for parsing
/// * `input` - The user's natural language request
/// * `context` - Current document context for disambiguation
pub async fn parse_intent(
    client: &LlmClient,
    input: &str,
    context: &ModelContext,
) -> Result<CadIntent> {
    let user_prompt = format!(
        "CONTEXT:\n{}\n\nUSER REQUEST:\n{}\n\nParse this request into one intent JSON:",
        context.summary(),
        input
    );

    let response = client.complete(PARSE_SYSTEM_PROMPT, &user_prompt).await?;
    let json_str = extract_json(&response)?;

    let intent: CadIntent = serde_json::from_str(json_str).map_err(|e| {
        EngineError::Llm(format!(
            "Failed to parse intent: {} - Response: {}",
            e, response
        ))
    })?;

    Ok(intent)
}

/// Extract a JSON object from an LLM response.
///
/// Prefers a fenced ```json block; falls back to the outermost braces when
/// the model answered with bare JSON or surrounding prose.
fn extract_json(response: &str) -> Result<&str> {
    if let Some(fenced) = extract_fenced(response) {
        return Ok(fenced);
    }

    let start = response
        .find('{')
        .ok_or_else(|| EngineError::Llm("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| EngineError::Llm("No closing brace found in response".into()))?;
    Ok(&response[start..=end])
}

fn extract_fenced(response: &str) -> Option<&str> {
    let after_open = response.split_once("```json").map(|(_, rest)| rest)?;
    let (body, _) = after_open.split_once("```")?;
    let body = body.trim();
    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}

/// System prompt for intent parsing
const PARSE_SYSTEM_PROMPT: &str = r#"You are the intent parser for a CAD automation agent
driving a parametric feature-tree kernel. Convert the user's request into exactly ONE
JSON intent. All dimensions are millimetres.

INTENT KINDS:
- CYLINDER: one solid cylinder on an origin plane. Fields: radius, height, plane ("XY"|"YZ"|"ZX", default "XY").
- STEPPED_CYLINDER: two stacked coaxial cylinders, optionally drilled. Fields: base_radius,
  base_height, step_radius, step_height, through_holes (list of hole radii, may be empty).
- PAD: extrude a profile on a support. Fields: profile, length, support, direction.
- POCKET: remove material below a profile. Fields: profile, depth, support, direction.
- COMPOUND: ordered list of the above. Fields: steps.
- REVOLVE / FILLET exist but the kernel cannot execute them; only emit them when the user
  explicitly asks for a revolution or a fillet.

PROFILES: {"shape": "CIRCLE", "radius": R} or {"shape": "RECTANGLE", "width": W, "height": H}.
SUPPORTS: {"role": "BASE_PLANE", "plane": "XY"} | {"role": "OF_PREVIOUS", "axis": "POS_Z"}
  | {"role": "FEATURE", "id": N, "axis": "POS_Z"}.
DIRECTIONS: "OUTWARD" | "INWARD" | "SYMMETRIC".

SOLID STACKING RULE:
- A feature built "on top of" an existing solid sketches on that solid's PLANAR top face:
  use support {"role": "OF_PREVIOUS", "axis": "POS_Z"}, never a new origin plane.
- A new solid stacked on another must not overhang its support face; the engine rejects
  overhangs. A "stepped" or "flange" request is STEPPED_CYLINDER, not two CYLINDERs.
- Holes are POCKETs cut INWARD from the face they start on; a "through" hole's depth is
  the full stack height.

OUTPUT FORMAT (JSON only, no explanation):
{"kind": "...", ...}

Examples:
"create a cylinder radius 50 thickness 20 on the XY plane"
-> {"kind": "CYLINDER", "radius": 50, "height": 20, "plane": "XY"}
"make a stepped flange: 30mm base, 10 tall, then a 20mm step 15 tall, 5mm hole through"
-> {"kind": "STEPPED_CYLINDER", "base_radius": 30, "base_height": 10, "step_radius": 20,
    "step_height": 15, "through_holes": [5]}
"drill a 4mm hole 10 deep into the top"
-> {"kind": "POCKET", "profile": {"shape": "CIRCLE", "radius": 4}, "depth": 10,
    "support": {"role": "OF_PREVIOUS", "axis": "POS_Z"}, "direction": "INWARD"}
"#;
