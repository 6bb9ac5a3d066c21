//! Shared constants for page handling
//!
//! Magic numbers used across import, transforms, annotations and export.

// =============================================================================
// Page Geometry
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

/// Smallest edge a crop rectangle may have (points)
pub const MIN_CROP_SIZE_PT: f32 = 1.0;

/// Page rotation must be a multiple of this many degrees
pub const ROTATION_STEP: i32 = 90;

/// Guard against cyclic page trees when resolving inherited attributes
pub const MAX_PAGE_TREE_DEPTH: usize = 64;

// =============================================================================
// Import / Export
// =============================================================================

/// Every PDF file starts with this header
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// PDF version written for documents we create
pub const OUTPUT_PDF_VERSION: &str = "1.7";

/// Filename proposed by default in export options
pub const DEFAULT_EXPORT_FILENAME: &str = "document.pdf";

/// Filename used when the export filename is blank
pub const FALLBACK_EXPORT_FILENAME: &str = "merged.pdf";

// =============================================================================
// Annotations
// =============================================================================

/// Stroke width for annotation outlines (points)
pub const ANNOTATION_LINE_WIDTH: f32 = 2.0;

/// Font size for text annotations (points)
pub const ANNOTATION_FONT_SIZE: f32 = 20.0;

/// Opacity of highlight fills
pub const HIGHLIGHT_ALPHA: f32 = 0.5;

/// Highlight size used when the rectangle is empty (width, height)
pub const DEFAULT_HIGHLIGHT_SIZE: (f32, f32) = (100.0, 20.0);

/// Control point factor for approximating circles with Bezier curves:
/// 4 * (sqrt(2) - 1) / 3
pub const BEZIER_CIRCLE_FACTOR: f32 = 0.552284749831;

// =============================================================================
// Notices
// =============================================================================

/// Number of notices kept before the oldest are dropped
pub const MAX_NOTICES: usize = 200;
