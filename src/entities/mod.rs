mod location;
mod page;
mod region;

pub use location::{Coordinates, Location, DEFAULT_DESCRIPTION, DEFAULT_NAME};
pub use page::{Page, NO_DESCRIPTION};
pub use region::{MapRegion, Span};
