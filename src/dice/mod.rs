pub mod die;
pub mod face;
pub mod group;
pub mod roll;
pub mod transitions;
