pub mod circle_intersector;
pub mod google_maps;
pub mod location_resolver;
pub mod path_provider;
pub mod providers;
pub mod route_matcher;
