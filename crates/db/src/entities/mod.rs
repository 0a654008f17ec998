//! `SeaORM` entity definitions.

pub mod content_blocks;

pub mod prelude {
    //! Entity re-exports.
    pub use super::content_blocks::Entity as ContentBlocks;
}
