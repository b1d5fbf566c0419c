/// Instruction sent verbatim with every screenshot. The output grammar at the
/// end is what `verdict::parse` understands.
pub const EVAL_PROMPT: &str = "\
You are evaluating a Shopify storefront screenshot against a specific vintage web aesthetic.

TARGET AESTHETIC — the page should match ALL of these traits:
• Boxed / table-like layouts with visible borders separating content regions
• Strong, solid borders (1-2 px) around major content blocks
• Compact, dense typography — no large hero text or oversized headings
• Blue hyperlinks (#0000EE or similar classic blue), including visited links
• Muted / off-white or light-grey background colors (no pure white hero sections)
• No modern card shadows, border-radius rounding, or glass-morphism effects
• Minimal or no animations / transitions
• Navigation presented as a horizontal or simple list of plain links, not pill-shaped buttons
• Overall feel: eBay circa 2004-2010 or YouTube circa 2007 — utilitarian, information-dense

INSTRUCTIONS:
1. Carefully examine every visible element on the page.
2. Flag ONLY issues that are fixable via CSS or minimal Liquid template edits.
   Do NOT flag: missing product data, empty cart states, placeholder content, or missing app blocks — those are data issues, not style issues.
3. For each issue, note which element is affected and what CSS property likely needs changing.

OUTPUT FORMAT — respond with EXACTLY this structure, nothing else:

EVALUATION: PASS
(use PASS only if there are zero style issues)

or

EVALUATION: FAIL
ISSUES:
- [element or region] — [what is wrong] — [suggested CSS fix]
- [element or region] — [what is wrong] — [suggested CSS fix]
...";

/// MIME type of every image payload.
pub const IMAGE_MIME: &str = "image/png";
