//! Mask geometry and interaction engine for photo-based area takeoff.
//!
//! Users draw polygonal regions ("masks") over a photograph, edit them point
//! by point, move and rotate them, and the resulting pixel areas are turned
//! into physical areas and priced. This crate owns the geometry and the
//! interaction state machines. The host layer is responsible for forwarding
//! pointer events with the current camera and image fit, rendering masks, and
//! delivering the [`engine::Action`]s it gets back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: the state container and every mutating action |
//! | [`doc`] | In-memory mask store and draw ordering |
//! | [`mask`] | Mask and mask point types, point-edit primitives, flatten |
//! | [`draft`] | Freehand polygon drafting |
//! | [`input`] | Interaction modes and the drag state machine |
//! | [`camera`] | Screen/image coordinate mapping |
//! | [`geometry`] | Area, containment, Bezier flattening |
//! | [`hit`] | Hit-testing masks, vertices and handles |
//! | [`quote`] | Physical area and quote totals |
//! | [`remote`] | Remote store seam used by deletion |
//! | [`config`] | Environment-driven engine configuration |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod draft;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod mask;
pub mod quote;
pub mod remote;
