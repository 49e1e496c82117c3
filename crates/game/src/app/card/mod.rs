mod phase;
mod scene;


pub(crate) use scene::CardScene;
