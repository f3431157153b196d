mod extraction;
mod scaffolding;
