// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// WebDriver backend - Page and ElementHandle over a remote W3C WebDriver session
//
// Architecture:
// - WebDriverPage owns a fantoccini Client (one WebDriver session)
// - WebDriverElement pairs a located fantoccini Element with that Client
// - Every capability call awaits one or more round-trips to the endpoint
// - Command failures surface as Error::Driver, missing frames as FrameNotFound

pub mod element;
pub mod page;

pub use element::WebDriverElement;
pub use page::WebDriverPage;
