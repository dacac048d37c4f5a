pub mod sections;

pub mod surveys;

pub use sections::configure_sections_routes;
pub use surveys::configure_surveys_routes;
