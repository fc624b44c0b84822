pub mod reference;
pub mod concept;

pub use self::reference::ReferenceCatalog;
pub use self::concept::ConceptCatalog;
