//! Test fixtures for Confluence API responses
//!
//! Sample payloads shaped like the Confluence Cloud v2 API.

use serde_json::json;

/// Full page as returned by `GET api/v2/pages/{id}`.
pub fn sample_page_response() -> serde_json::Value {
  json!({
    "id": "123456",
    "status": "current",
    "title": "Getting Started Guide",
    "spaceId": "98304",
    "parentId": "65538",
    "parentType": "page",
    "authorId": "557058:0b1c",
    "createdAt": "2024-05-01T09:30:00.000Z",
    "version": {
      "number": 3,
      "message": "",
      "minorEdit": false,
      "authorId": "557058:0b1c",
      "createdAt": "2024-05-03T12:00:00.000Z"
    },
    "body": {
      "storage": {
        "representation": "storage",
        "value": "<h1>Getting Started</h1><p>Welcome to our documentation!</p>"
      }
    },
    "ancestors": [
      { "id": "65537" },
      { "id": "65538" }
    ],
    "_links": {
      "base": "https://example.atlassian.net/wiki",
      "webui": "/spaces/DOCS/pages/123456/Getting+Started+Guide",
      "editui": "/pages/resumedraft.action?draftId=123456",
      "tinyui": "/x/QAAB"
    }
  })
}

/// Title search result: only a partial page per hit.
pub fn sample_search_response() -> serde_json::Value {
  json!({
    "results": [
      {
        "id": "123456",
        "status": "current",
        "title": "Getting Started Guide",
        "spaceId": "98304"
      }
    ],
    "_links": {
      "base": "https://example.atlassian.net/wiki"
    }
  })
}

pub fn empty_results_response() -> serde_json::Value {
  json!({ "results": [], "_links": {} })
}

/// Page as returned right after creation.
pub fn sample_created_page_response() -> serde_json::Value {
  json!({
    "id": "777001",
    "status": "current",
    "title": "T",
    "spaceId": "SPC",
    "version": { "number": 1, "message": "", "minorEdit": false },
    "body": { "storage": { "representation": "storage", "value": "<p>hi</p>" } },
    "_links": {
      "base": "https://example.atlassian.net/wiki",
      "webui": "/spaces/SPC/pages/777001/T"
    }
  })
}

/// Attachment listing filtered by file name.
pub fn sample_attachments_response() -> serde_json::Value {
  json!({
    "results": [
      {
        "id": "att720903",
        "status": "current",
        "title": "diagram.png",
        "mediaType": "image/png",
        "fileSize": 48213,
        "pageId": "123456",
        "version": { "number": 2 },
        "downloadLink": "/download/attachments/123456/diagram.png?version=2&api=v2"
      }
    ],
    "_links": {}
  })
}

/// Response of the v1 attachment upload endpoint.
pub fn sample_uploaded_attachment_response() -> serde_json::Value {
  json!({
    "results": [
      {
        "id": "att720904",
        "type": "attachment",
        "status": "current",
        "title": "diagram.png",
        "version": { "number": 1 },
        "extensions": { "mediaType": "image/png", "fileSize": 4, "comment": "first upload" }
      }
    ],
    "size": 1
  })
}

pub fn sample_ancestors_response() -> serde_json::Value {
  json!({
    "results": [
      { "id": "65537", "type": "page" },
      { "id": "65538", "type": "page" }
    ],
    "_links": {}
  })
}

pub fn sample_labels_response() -> serde_json::Value {
  json!({
    "results": [
      { "id": "1001", "name": "docs", "prefix": "global" },
      { "id": "1002", "name": "generated", "prefix": "global" }
    ],
    "_links": {}
  })
}

pub fn sample_space_response() -> serde_json::Value {
  json!({
    "id": "98304",
    "key": "DOCS",
    "name": "Documentation",
    "type": "global",
    "status": "current",
    "homepageId": "65537",
    "_links": { "webui": "/spaces/DOCS" }
  })
}
