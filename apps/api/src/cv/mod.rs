// CV API: upload, parse, translate, render.

pub mod handlers;
