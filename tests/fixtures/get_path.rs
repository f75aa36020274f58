/**
gopenapi:path
/the/path:
	summary: The path
	parameters:
	- name: id
	  in: query
	get:
	  operationId: getThePath
	  responses:
	    "200":
	      description: Fetched
*/
pub async fn get_the_path() {}
